use eframe::egui;
use egui::{Color32, RichText};
use std::time::Duration;

use crate::config::{Config, WeekStart};
use crate::host::ProfileHost;
use crate::i18n::{StringTable, Translate, LANGUAGES};
use crate::model::{ChildIndex, ModelError, NodeKind, ProfileCollection, ProfileData, ProfileNode};
use super::day_of_week::apply_toggle;
use super::timeline::{ResizeHub, TimelineState, REMEASURE_DELAY};
use super::tree_view::{drop_node, DialogMode, NodeDialog, TreeViewState};
use super::views::{self, DetailAction, DialogOutcome, TreeAction};

pub struct ProfileEditorApp {
    config: Config,
    host: Box<dyn ProfileHost>,
    strings: StringTable,

    // Derived from the host's collection, rebuilt after every commit
    index: ChildIndex,

    tree: TreeViewState,
    dialog: Option<NodeDialog>,

    // Timeline sizing
    resize_hub: ResizeHub,
    timeline: Option<TimelineState>,
    last_screen_size: Option<egui::Vec2>,

    // Members text field, tied to the profile it was filled from
    members_text: String,
    members_for: Option<String>,

    // Settings dialog
    show_settings: bool,
    settings_language: String,
    settings_week_start: WeekStart,
    settings_font_scale: f32,

    status_message: Option<(String, bool)>, // (message, is_error)
}

impl ProfileEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, host: Box<dyn ProfileHost>) -> Self {
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);

        let strings = load_strings(&config.language);
        let index = ChildIndex::build(host.profiles());
        tracing::info!(nodes = host.profiles().len(), language = %config.language, "editor started");

        Self {
            settings_language: config.language.clone(),
            settings_week_start: config.week_start,
            settings_font_scale: config.font_scale,
            config,
            host,
            strings,
            index,
            tree: TreeViewState::default(),
            dialog: None,
            resize_hub: ResizeHub::new(),
            timeline: None,
            last_screen_size: None,
            members_text: String::new(),
            members_for: None,
            show_settings: false,
            status_message: None,
        }
    }

    /// Hand a new collection to the host. Rejected edits leave everything as it was.
    fn commit(&mut self, result: Result<ProfileCollection, ModelError>, what: &str) {
        let profiles = match result {
            Ok(profiles) => profiles,
            Err(err) => {
                tracing::warn!(action = what, error = %err, "edit rejected");
                self.status_message = Some((err.to_string(), true));
                return;
            }
        };

        if let Err(err) = self.host.on_change_profiles(profiles) {
            tracing::error!(action = what, error = %format!("{err:#}"), "unable to store profiles");
            self.status_message = Some((format!("Failed to save: {err:#}"), true));
            return;
        }

        self.index = ChildIndex::build(self.host.profiles());
        tracing::debug!(action = what, nodes = self.host.profiles().len(), "profiles committed");

        let selection_gone = self
            .host
            .selected()
            .is_some_and(|id| self.host.profiles().get(id).is_none());
        if selection_gone {
            self.select(None);
        }
    }

    fn select(&mut self, id: Option<&str>) {
        tracing::debug!(profile = ?id, "profile selected");
        self.host.on_select_profile(id);
    }

    fn handle_tree_action(&mut self, action: TreeAction) {
        let profiles = self.host.profiles();
        match action {
            TreeAction::Select(id) => self.select(Some(&id)),
            TreeAction::ToggleOpen(id, is_open) => {
                let result = profiles.toggle_open(&id, is_open);
                self.commit(result, "toggle open");
            }
            TreeAction::ToggleEnabled(id) => {
                let result = profiles.set_enabled(&id);
                self.commit(result, "toggle enabled");
            }
            TreeAction::Add { parent, kind } => {
                self.dialog = Some(NodeDialog::add(&parent, kind, &self.strings));
            }
            TreeAction::Edit(id) => {
                self.dialog = profiles.get(&id).map(NodeDialog::edit);
            }
            TreeAction::Duplicate(id) => {
                self.dialog = profiles
                    .get(&id)
                    .map(|node| NodeDialog::duplicate(node, &self.strings));
            }
            TreeAction::Drop { node, target } => {
                let result = drop_node(profiles, &node, &target, &self.strings);
                self.commit(result, "move");
            }
            TreeAction::OpenAll => {
                let result = Ok(profiles.open_all());
                self.commit(result, "open all");
            }
            TreeAction::CloseAll => {
                let result = Ok(profiles.close_all());
                self.commit(result, "close all");
            }
        }
    }

    fn handle_dialog(&mut self, outcome: DialogOutcome) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };

        match outcome {
            DialogOutcome::Cancel => {}
            DialogOutcome::Delete => {
                let result = dialog.delete(self.host.profiles());
                self.commit(result, "delete");
            }
            DialogOutcome::Submit => {
                let defaults = ProfileData::new_default(&self.config.domains, self.config.default_interval_minutes);
                match dialog.submit(self.host.profiles(), &defaults) {
                    Ok((profiles, id)) => {
                        let profiles = dialog.reveal(profiles);
                        let is_new_profile = !matches!(dialog.mode, DialogMode::Edit { .. })
                            && profiles.get(&id).is_some_and(|node| node.kind == NodeKind::Profile);
                        self.commit(Ok(profiles), dialog.labels().0);
                        if is_new_profile {
                            self.select(Some(&id));
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "dialog rejected");
                        self.status_message = Some((err.to_string(), true));
                        // Keep the dialog open so the name can be fixed
                        self.dialog = Some(dialog);
                    }
                }
            }
        }
    }

    fn handle_detail(&mut self, id: &str, data: &ProfileData, action: DetailAction) {
        let profiles = self.host.profiles();
        let domain = self.config.domains.get(data.interval_type);
        let result = match action {
            DetailAction::ToggleEnabled => profiles.set_enabled(id),
            DetailAction::IntervalType(interval_type) => {
                profiles.set_interval_type(id, interval_type, self.config.domains.get(interval_type))
            }
            DetailAction::Duration(minutes) => profiles.set_interval_duration(id, minutes, domain),
            DetailAction::Priority(priority) => profiles.set_priority(id, priority),
            DetailAction::Members(members) => profiles.set_members(id, &members),
            DetailAction::Day(toggle) => apply_toggle(profiles, id, toggle),
        };
        self.commit(result, "profile details");
        // Re-read the normalized member list
        self.members_for = None;
    }

    fn save_settings(&mut self) {
        self.config.language = self.settings_language.clone();
        self.config.week_start = self.settings_week_start;
        self.config.font_scale = self.settings_font_scale;

        match self.config.save() {
            Ok(()) => {
                if self.strings.language() != self.config.language {
                    self.strings = load_strings(&self.config.language);
                }
                self.show_settings = false;
                self.status_message = Some((self.strings.t("Saved"), false));
                tracing::info!(language = %self.config.language, "settings saved");
            }
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "unable to save settings");
                self.status_message = Some((format!("Failed to save: {err:#}"), true));
            }
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        let section_color = Color32::from_rgb(140, 140, 160);
        let t = &self.strings;

        ui.label(RichText::new(t.t("Settings")).color(section_color).strong());
        ui.add_space(8.0);

        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label(t.t("Language"));
                ui.horizontal(|ui| {
                    for language in LANGUAGES {
                        let label = match language {
                            "de" => "Deutsch",
                            _ => "English",
                        };
                        ui.radio_value(&mut self.settings_language, language.to_string(), label);
                    }
                });
                ui.end_row();

                ui.label(t.t("Week starts on"));
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.settings_week_start, WeekStart::Sunday, t.t("sunday"));
                    ui.radio_value(&mut self.settings_week_start, WeekStart::Monday, t.t("monday"));
                });
                ui.end_row();

                ui.label(t.t("Font scale"));
                ui.horizontal(|ui| {
                    ui.add(egui::Slider::new(&mut self.settings_font_scale, 0.75..=2.0).show_value(false));
                    ui.label(format!("{:.0}%", self.settings_font_scale * 100.0));
                });
                ui.end_row();
            });

        ui.add_space(24.0);

        let save_label = t.t("Save");
        let cancel_label = t.t("Cancel");
        ui.horizontal(|ui| {
            if views::painted_button(ui, &save_label, true) {
                self.save_settings();
            }
            if views::painted_button(ui, &cancel_label, true) {
                self.show_settings = false;
            }
        });
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{} Profile editor", egui_phosphor::regular::CLOCK)).strong());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let text_color = Color32::from_rgb(150, 150, 150);
                let font_id = egui::FontId::proportional(18.0);
                let settings_icon = egui_phosphor::regular::FADERS_HORIZONTAL;
                let icon_size = ui.fonts(|f| f.layout_no_wrap(settings_icon.to_string(), font_id.clone(), Color32::WHITE).size());
                let (settings_rect, settings_response) = ui.allocate_exact_size(icon_size + egui::vec2(8.0, 4.0), egui::Sense::click());
                let settings_col = if settings_response.hovered() { Color32::WHITE } else { text_color };
                ui.painter().text(settings_rect.center(), egui::Align2::CENTER_CENTER, settings_icon, font_id, settings_col);
                if settings_response.on_hover_text(self.strings.t("Settings")).clicked() {
                    // Reset the form to the current config
                    self.settings_language = self.config.language.clone();
                    self.settings_week_start = self.config.week_start;
                    self.settings_font_scale = self.config.font_scale;
                    self.show_settings = true;
                }
            });
        });
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        let mut dismiss_message = false;
        if let Some((msg, is_error)) = &self.status_message {
            let color = if *is_error {
                Color32::from_rgb(224, 108, 117)
            } else {
                Color32::from_rgb(152, 195, 121)
            };
            let dim_color = Color32::from_rgb(120, 120, 130);
            ui.horizontal(|ui| {
                ui.label(RichText::new(msg).color(color));
                ui.add_space(8.0);
                let close_btn = ui.add(egui::Label::new(
                    RichText::new(egui_phosphor::regular::X).size(14.0).color(dim_color)
                ).sense(egui::Sense::click()));
                if close_btn.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if close_btn.clicked() {
                    dismiss_message = true;
                }
            });
        }
        if dismiss_message {
            self.status_message = None;
        }
    }
}

fn load_strings(language: &str) -> StringTable {
    StringTable::for_language(language).unwrap_or_else(|err| {
        tracing::warn!(language, error = %format!("{err:#}"), "string table unavailable, using English");
        StringTable::default()
    })
}

impl eframe::App for ProfileEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                if let Err(err) = self.config.save() {
                    tracing::warn!(error = %format!("{err:#}"), "unable to save font scale");
                }
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        // Window resizes schedule a re-measurement of the timeline
        let now = ctx.input(|i| i.time);
        let screen_size = ctx.screen_rect().size();
        if self.last_screen_size.is_some_and(|size| size != screen_size) {
            self.resize_hub.notify(now);
        }
        self.last_screen_size = Some(screen_size);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_header(ui);
            ui.add_space(4.0);
        });

        if self.status_message.is_some() {
            egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
                self.render_status(ui);
            });
        }

        let mut tree_action = None;
        egui::SidePanel::left("profile_tree")
            .resizable(true)
            .default_width(320.0)
            .min_width(220.0)
            .show(ctx, |ui| {
                tree_action = views::render_tree_panel(
                    ui,
                    self.host.profiles(),
                    &self.index,
                    &mut self.tree,
                    self.host.selected(),
                    &self.strings,
                );
            });
        if let Some(action) = tree_action {
            self.handle_tree_action(action);
        }

        let selected: Option<ProfileNode> = self
            .host
            .selected()
            .and_then(|id| self.host.profiles().get(id))
            .filter(|node| node.kind == NodeKind::Profile)
            .cloned();

        let mut detail_action = None;
        let mut committed_intervals = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::same(16.0)))
            .show(ctx, |ui| {
                let Some((node, data)) = selected.as_ref().and_then(|node| node.data.as_ref().map(|data| (node, data))) else {
                    self.timeline = None;
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new(self.strings.t("Select a profile")).color(Color32::from_rgb(112, 112, 104)));
                    });
                    return;
                };

                if self.members_for.as_deref() != Some(node.id.as_str()) {
                    self.members_text = data.members.join(", ");
                    self.members_for = Some(node.id.clone());
                }

                detail_action = views::render_details(ui, node, data, &self.config, &mut self.members_text, &self.strings);
                ui.add_space(16.0);

                let domain = self.config.domains.get(data.interval_type);
                let width = ui.available_width();
                let slot_count = data.intervals.len();
                if self.timeline.as_ref().map(|state| state.profile_id.as_str()) != Some(node.id.as_str()) {
                    // Replacing the state drops the old resize subscription
                    self.timeline = Some(TimelineState::mount(&self.resize_hub, &node.id, width, slot_count));
                }
                if let Some(timeline) = self.timeline.as_mut() {
                    if timeline.sync(now, width, slot_count) {
                        tracing::trace!(width, slot_count, "timeline re-measured");
                    }
                    if timeline.remeasure_pending() {
                        ui.ctx().request_repaint_after(Duration::from_secs_f64(REMEASURE_DELAY));
                    }
                    committed_intervals = views::render_timeline(ui, timeline, data, domain, &self.strings)
                        .map(|intervals| (intervals, domain));
                }
            });

        if let Some(node) = &selected {
            if let Some(data) = &node.data {
                if let Some((intervals, domain)) = committed_intervals {
                    let result = self.host.profiles().set_intervals(&node.id, &intervals, domain);
                    self.commit(result, "intervals");
                }
                if let Some(action) = detail_action {
                    self.handle_detail(&node.id, data, action);
                }
            }
        }

        if let Some(dialog) = self.dialog.as_mut() {
            if let Some(outcome) = views::render_node_dialog(ctx, dialog, self.host.profiles(), &self.strings) {
                self.handle_dialog(outcome);
            }
        }

        if self.show_settings {
            let (content_bg, frame_color, _) = super::theme::dialog_colors();
            let dialog_frame = egui::Frame::none()
                .fill(content_bg)
                .stroke(egui::Stroke::new(2.0, frame_color))
                .rounding(egui::Rounding::same(8.0))
                .inner_margin(egui::Margin::same(20.0));

            let title = self.strings.t("Settings");
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .frame(dialog_frame)
                .show(ctx, |ui| {
                    self.render_settings(ui);
                });
        }
    }
}
