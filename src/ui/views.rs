use egui::{pos2, vec2, Align2, Color32, CursorIcon, FontFamily, FontId, Pos2, Rect, RichText, Sense, Stroke, Ui};
use egui_phosphor::regular as icons;

use crate::config::Config;
use crate::i18n::Translate;
use crate::model::{
    format_value, label_for_slot, slot_clock_label, valid_durations, ChildIndex, Domain, IntervalType,
    NodeKind, Priority, ProfileCollection, ProfileData, ProfileNode,
};
use super::day_of_week::{DayOfWeekPanel, DayToggle};
use super::theme::{
    accent, bar_color, dialog_colors, phosphor_fill_family, priority_color, slot_colors, tree_row_colors,
};
use super::timeline::{fill_fraction, value_at, SelectDrag, TimelineState, ValueDrag};
use super::tree_view::{can_drop, visible_rows, NodeDialog, TreeRow, TreeViewState};

const ROW_HEIGHT: f32 = 26.0;
const INDENT: f32 = 18.0;
const TRACK_HEIGHT: f32 = 180.0;
const LABEL_HEIGHT: f32 = 22.0;
/// Narrower slots drop their value text and quarter-hour labels
const TEXT_SLOT_WIDTH: f32 = 26.0;

/// Result from tree panel interactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    Select(String),
    ToggleOpen(String, bool),
    ToggleEnabled(String),
    Add { parent: String, kind: NodeKind },
    Edit(String),
    Duplicate(String),
    Drop { node: String, target: String },
    OpenAll,
    CloseAll,
}

/// Result from the profile detail editor
#[derive(Debug, Clone, PartialEq)]
pub enum DetailAction {
    ToggleEnabled,
    IntervalType(IntervalType),
    Duration(u32),
    Priority(Priority),
    Members(Vec<String>),
    Day(DayToggle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Submit,
    Delete,
    Cancel,
}

/// Text button painted like the rest of the app's buttons
pub fn painted_button(ui: &mut Ui, text: &str, enabled: bool) -> bool {
    let btn_bg = Color32::from_rgb(0x28, 0x28, 0x26);
    let btn_hover = Color32::from_rgb(0x50, 0x50, 0x4a);
    let text_color = if enabled {
        Color32::from_rgb(200, 200, 192)
    } else {
        Color32::from_rgb(90, 90, 84)
    };
    let font_id = FontId::proportional(15.0);
    let padding = vec2(14.0, 7.0);

    let text_size = ui.fonts(|f| f.layout_no_wrap(text.to_string(), font_id.clone(), text_color).size());
    let sense = if enabled { Sense::click() } else { Sense::hover() };
    let (rect, response) = ui.allocate_exact_size(text_size + padding * 2.0, sense);
    let hovered = enabled && response.hovered();

    ui.painter().rect_filled(rect, 6.0, if hovered { btn_hover } else { btn_bg });
    ui.painter().text(rect.center(), Align2::CENTER_CENTER, text, font_id, text_color);
    if hovered {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
    }
    enabled && response.clicked()
}

fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str) -> bool {
    let (rect, response) = ui.allocate_exact_size(vec2(26.0, 26.0), Sense::click());
    paint_icon(ui, rect, icon, response.hovered());
    if response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
    }
    response.on_hover_text(tooltip).clicked()
}

/// Icon button inside an already allocated row
fn row_tool(ui: &Ui, rect: Rect, id: egui::Id, icon: &str, tooltip: &str) -> bool {
    let response = ui.interact(rect, id, Sense::click());
    paint_icon(ui, rect, icon, response.hovered());
    if response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
    }
    if tooltip.is_empty() {
        return response.clicked();
    }
    response.on_hover_text(tooltip).clicked()
}

fn paint_icon(ui: &Ui, rect: Rect, icon: &str, hovered: bool) {
    let color = if hovered {
        ui.painter().rect_filled(rect, 4.0, Color32::from_rgb(40, 40, 38));
        Color32::WHITE
    } else {
        Color32::from_rgb(176, 176, 168)
    };
    ui.painter().text(rect.center(), Align2::CENTER_CENTER, icon, FontId::proportional(17.0), color);
}

/// Profile tree: header actions, optional search field, rows and the root drop zone
pub fn render_tree_panel(
    ui: &mut Ui,
    profiles: &ProfileCollection,
    index: &ChildIndex,
    state: &mut TreeViewState,
    selected: Option<&str>,
    t: &dyn Translate,
) -> Option<TreeAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new(t.t("Profiles")).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if icon_button(ui, icons::MAGNIFYING_GLASS, &t.t("Search")) {
                state.toggle_search();
            }
            let (icon, label, next) = if profiles.any_folder_open() {
                (icons::FOLDER, "Close all", TreeAction::CloseAll)
            } else {
                (icons::FOLDER_OPEN, "Open all", TreeAction::OpenAll)
            };
            if icon_button(ui, icon, &t.t(label)) {
                action = Some(next);
            }
            if icon_button(ui, icons::FOLDER_PLUS, &t.t("Add folder")) {
                action = Some(TreeAction::Add {
                    parent: String::new(),
                    kind: NodeKind::Folder,
                });
            }
            if icon_button(ui, icons::FILE_PLUS, &t.t("Add profile")) {
                action = Some(TreeAction::Add {
                    parent: String::new(),
                    kind: NodeKind::Profile,
                });
            }
        });
    });

    if let Some(query) = state.search.as_mut() {
        let mut finished = false;
        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(query)
                    .hint_text(t.t("search text"))
                    .desired_width(ui.available_width() - 34.0),
            );
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                finished = true;
            }
            if icon_button(ui, icons::X, &t.t("finish searching")) {
                finished = true;
            }
        });
        if finished {
            state.search = None;
        }
    }

    ui.separator();

    let rows = visible_rows(profiles, index, state.query());
    let pointer = ui.input(|i| i.pointer.hover_pos());
    let released = ui.input(|i| i.pointer.any_released());
    let mut drop_target: Option<String> = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.y = 2.0;
            for row in &rows {
                if let Some(row_action) =
                    render_tree_row(ui, profiles, row, state, selected, pointer, &mut drop_target, t)
                {
                    action = Some(row_action);
                }
            }

            // Everything below the rows moves nodes to the top level
            let height = ui.available_height().max(ROW_HEIGHT * 2.0);
            let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
            if let (Some(dragging), Some(pos)) = (state.dragging.as_deref(), pointer) {
                if rect.contains(pos) && can_drop(profiles, dragging, "") {
                    drop_target = Some(String::new());
                    ui.painter().rect_stroke(rect.shrink(2.0), 6.0, Stroke::new(1.5, accent()));
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        t.t("Move to top level"),
                        FontId::proportional(13.0),
                        accent(),
                    );
                }
            }
        });

    if let Some(dragging) = state.dragging.as_deref() {
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        if let (Some(node), Some(pos)) = (profiles.get(dragging), pointer) {
            let painter = ui.ctx().layer_painter(egui::LayerId::new(
                egui::Order::Tooltip,
                egui::Id::new("tree_drag_ghost"),
            ));
            painter.text(
                pos + vec2(14.0, 0.0),
                Align2::LEFT_CENTER,
                &node.title,
                FontId::proportional(14.0),
                Color32::from_rgba_unmultiplied(255, 255, 255, 180),
            );
        }
    }

    if released {
        if let (Some(node), Some(target)) = (state.dragging.take(), drop_target) {
            action = Some(TreeAction::Drop { node, target });
        }
    }

    action
}

#[allow(clippy::too_many_arguments)]
fn render_tree_row(
    ui: &mut Ui,
    profiles: &ProfileCollection,
    row: &TreeRow,
    state: &mut TreeViewState,
    selected: Option<&str>,
    pointer: Option<Pos2>,
    drop_target: &mut Option<String>,
    t: &dyn Translate,
) -> Option<TreeAction> {
    let mut action = None;
    let (rect, response) = ui.allocate_exact_size(vec2(ui.available_width(), ROW_HEIGHT), Sense::click_and_drag());

    let drop_here = match (state.dragging.as_deref(), pointer) {
        (Some(dragging), Some(pos)) => {
            rect.contains(pos) && row.kind == NodeKind::Folder && can_drop(profiles, dragging, &row.id)
        }
        _ => false,
    };
    if drop_here {
        *drop_target = Some(row.id.clone());
    }

    let active = selected == Some(row.id.as_str());
    let (bg, text_color) = tree_row_colors(active, drop_here);
    let row_hovered = response.contains_pointer() && state.dragging.is_none();
    let bg = if row_hovered && !active && !drop_here {
        Color32::from_rgb(28, 28, 26)
    } else {
        bg
    };
    ui.painter().rect_filled(rect, 4.0, bg);
    if drop_here {
        ui.painter().rect_stroke(rect, 4.0, Stroke::new(1.5, accent()));
    }

    let mut x = rect.left() + 4.0 + row.depth as f32 * INDENT;
    let center_y = rect.center().y;
    let searching = !state.query().is_empty();

    // Expand caret
    if row.kind == NodeKind::Folder && !searching {
        let caret_rect = Rect::from_min_size(pos2(x, rect.top()), vec2(INDENT, ROW_HEIGHT));
        let caret = if row.is_open { icons::CARET_DOWN } else { icons::CARET_RIGHT };
        if row_tool(ui, caret_rect, ui.id().with(("caret", &row.id)), caret, "") {
            action = Some(TreeAction::ToggleOpen(row.id.clone(), !row.is_open));
        }
    }
    x += INDENT;

    // Filled glyphs, except an outlined clock for disabled profiles
    let folder_color = Color32::from_rgb(0xe5, 0xc0, 0x7b);
    let (icon, icon_color, family) = match row.kind {
        NodeKind::Folder if row.is_open => (egui_phosphor::fill::FOLDER_OPEN, folder_color, phosphor_fill_family()),
        NodeKind::Folder => (egui_phosphor::fill::FOLDER, folder_color, phosphor_fill_family()),
        NodeKind::Profile if row.enabled == Some(false) => {
            (icons::CLOCK, Color32::from_rgb(90, 90, 84), FontFamily::Proportional)
        }
        NodeKind::Profile => (egui_phosphor::fill::CLOCK, priority_color(row.priority), phosphor_fill_family()),
    };
    ui.painter().text(pos2(x, center_y), Align2::LEFT_CENTER, icon, FontId::new(16.0, family), icon_color);
    x += 22.0;

    let title_color = if row.enabled == Some(false) {
        Color32::from_rgb(112, 112, 104)
    } else {
        text_color
    };
    let title_rect = ui.painter().text(
        pos2(x, center_y),
        Align2::LEFT_CENTER,
        &row.title,
        FontId::proportional(14.0),
        title_color,
    );
    if let Some(parent_title) = &row.parent_title {
        ui.painter().text(
            pos2(title_rect.right() + 6.0, center_y),
            Align2::LEFT_CENTER,
            format!("({parent_title})"),
            FontId::proportional(12.0),
            Color32::from_rgb(112, 112, 104),
        );
    }

    // Row tools, right to left
    let tool_size = vec2(22.0, 22.0);
    let mut right = rect.right() - 2.0;
    let mut next_tool = || {
        let tool = Rect::from_center_size(pos2(right - tool_size.x / 2.0, center_y), tool_size);
        right -= tool_size.x + 2.0;
        tool
    };

    if let Some(enabled) = row.enabled {
        let (icon, label) = if enabled {
            (icons::TOGGLE_RIGHT, "Enabled")
        } else {
            (icons::TOGGLE_LEFT, "Disabled")
        };
        if row_tool(ui, next_tool(), ui.id().with(("enabled", &row.id)), icon, &t.t(label)) {
            action = Some(TreeAction::ToggleEnabled(row.id.clone()));
        }
    }

    if row_hovered || active {
        if row_tool(ui, next_tool(), ui.id().with(("edit", &row.id)), icons::PENCIL_SIMPLE, &t.t("Edit")) {
            action = Some(TreeAction::Edit(row.id.clone()));
        }
        if row_tool(ui, next_tool(), ui.id().with(("copy", &row.id)), icons::COPY, &t.t("Duplicate")) {
            action = Some(TreeAction::Duplicate(row.id.clone()));
        }
        if row.kind == NodeKind::Folder {
            let add_folder = next_tool();
            let add_profile = next_tool();
            if row_tool(ui, add_folder, ui.id().with(("add_folder", &row.id)), icons::FOLDER_PLUS, &t.t("Add new child folder")) {
                action = Some(TreeAction::Add {
                    parent: row.id.clone(),
                    kind: NodeKind::Folder,
                });
            }
            if row_tool(ui, add_profile, ui.id().with(("add_profile", &row.id)), icons::FILE_PLUS, &t.t("Add new child profile")) {
                action = Some(TreeAction::Add {
                    parent: row.id.clone(),
                    kind: NodeKind::Profile,
                });
            }
        }
    }

    if action.is_some() {
        return action;
    }

    if response.drag_started() {
        state.dragging = Some(row.id.clone());
    } else if response.double_clicked() {
        action = Some(TreeAction::Edit(row.id.clone()));
    } else if response.clicked() {
        action = Some(match row.kind {
            NodeKind::Folder => TreeAction::ToggleOpen(row.id.clone(), !row.is_open),
            NodeKind::Profile => TreeAction::Select(row.id.clone()),
        });
    }

    action
}

/// Selection toolbar, the value bars and the time labels.
///
/// Returns the new intervals when a value drag was released.
pub fn render_timeline(
    ui: &mut Ui,
    state: &mut TimelineState,
    data: &ProfileData,
    domain: Domain,
    t: &dyn Translate,
) -> Option<Vec<f64>> {
    ui.horizontal(|ui| {
        if !state.selection.is_empty() {
            ui.label(format!("{} {}", state.selection.len(), t.t("selected")));
            if painted_button(ui, &format!("{} {}", icons::X, t.t("Clear selection")), true) {
                state.selection.clear();
            }
        }
    });

    let size = vec2(state.layout.content_width(), TRACK_HEIGHT + LABEL_HEIGHT * 2.0);
    if state.layout.overflows() {
        egui::ScrollArea::horizontal()
            .show(ui, |ui| paint_timeline(ui, state, data, domain, size, t))
            .inner
    } else {
        paint_timeline(ui, state, data, domain, size, t)
    }
}

fn paint_timeline(
    ui: &mut Ui,
    state: &mut TimelineState,
    data: &ProfileData,
    domain: Domain,
    size: egui::Vec2,
    t: &dyn Translate,
) -> Option<Vec<f64>> {
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let value_row = Rect::from_min_size(rect.min, vec2(size.x, LABEL_HEIGHT));
    let track = Rect::from_min_size(pos2(rect.left(), value_row.bottom()), vec2(size.x, TRACK_HEIGHT));
    let label_row = Rect::from_min_size(pos2(rect.left(), track.bottom()), vec2(size.x, LABEL_HEIGHT));

    let track_response = ui.interact(track, ui.id().with("timeline_track"), Sense::click_and_drag());
    let label_response = ui.interact(label_row, ui.id().with("timeline_labels"), Sense::click_and_drag());
    let (pointer, pressed, down, command, shift) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.modifiers.command,
            i.modifiers.shift,
        )
    });

    let layout = state.layout;
    let mut committed = None;

    if let Some(pos) = pointer {
        // Value painting on the bars
        let slot = layout.slot_at(pos.x - track.left());
        let value = value_at(pos.y, track.top(), track.height(), domain);
        if pressed && track_response.hovered() && state.select_drag.is_none() {
            if let Some(slot) = slot {
                state.value_drag = ValueDrag::start(&data.intervals, slot, value).ok();
            }
        } else if let (Some(drag), Some(slot)) = (state.value_drag.as_mut(), slot) {
            drag.update(slot, value);
        }

        // Slot selection on the labels
        let slot = layout.slot_at(pos.x - label_row.left());
        if pressed && label_response.hovered() && state.value_drag.is_none() {
            if let Some(slot) = slot {
                if command {
                    state.selection.toggle(slot);
                } else {
                    state.select_drag = Some(SelectDrag::start(&state.selection, slot, shift));
                }
            }
        } else if let (Some(drag), Some(slot)) = (state.select_drag.as_mut(), slot) {
            drag.update(slot);
        }
    }

    if !down {
        if let Some(drag) = state.value_drag.take() {
            let next = drag.preview(&state.selection, domain);
            if next.as_slice() != drag.original() {
                committed = Some(next);
            }
        }
        if let Some(drag) = state.select_drag.take() {
            state.selection = drag.selection();
        }
    }

    let values = match &state.value_drag {
        Some(drag) => drag.preview(&state.selection, domain),
        None => data.intervals.clone(),
    };
    let selection = match &state.select_drag {
        Some(drag) => drag.selection(),
        None => state.selection.clone(),
    };
    let hovered_slot = pointer
        .filter(|pos| track.contains(*pos))
        .and_then(|pos| layout.slot_at(pos.x - track.left()));

    let painter = ui.painter();
    let bar = bar_color(data.interval_type);
    let slot_width = layout.slot_width();
    let roomy = slot_width >= TEXT_SLOT_WIDTH;

    for (index, value) in values.iter().enumerate() {
        let left = track.left() + layout.slot_left(index);
        let slot_rect = Rect::from_min_size(pos2(left, track.top()), vec2((slot_width - 1.0).max(1.0), track.height()));
        let selected = selection.contains(index);
        let (bg, border, hover) = slot_colors(selected);

        painter.rect_filled(slot_rect, 2.0, if hovered_slot == Some(index) { hover } else { bg });
        if selected {
            painter.rect_stroke(slot_rect, 2.0, Stroke::new(1.0, border));
        }

        let height = fill_fraction(*value, domain) * track.height();
        let bar_rect = Rect::from_min_max(pos2(slot_rect.left(), slot_rect.bottom() - height), slot_rect.max);
        painter.rect_filled(bar_rect, 2.0, bar);

        if roomy {
            painter.text(
                pos2(slot_rect.center().x, value_row.center().y),
                Align2::CENTER_CENTER,
                display_value(*value, data.interval_type, t),
                FontId::proportional(11.0),
                Color32::from_rgb(208, 208, 200),
            );
        }

        let (hour, minute) = label_for_slot(index, data.interval_duration_minutes);
        let label = if minute == "00" {
            Some(hour.to_string())
        } else if roomy {
            Some(format!(":{minute}"))
        } else {
            None
        };
        if let Some(label) = label {
            let color = if selected { accent() } else { Color32::from_rgb(140, 140, 132) };
            painter.text(
                pos2(slot_rect.center().x, label_row.center().y),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(11.0),
                color,
            );
        }
    }

    // Readout of the window being painted
    if let Some(drag) = &state.value_drag {
        let (first, last) = drag.window();
        painter.text(
            pos2(track.left() + 6.0, track.top() + 6.0),
            Align2::LEFT_TOP,
            format!(
                "{} - {}  {}",
                slot_clock_label(first, data.interval_duration_minutes),
                slot_clock_label(last + 1, data.interval_duration_minutes),
                display_value(drag.value(), data.interval_type, t)
            ),
            FontId::proportional(13.0),
            Color32::WHITE,
        );
    }

    if track_response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::ResizeVertical);
    }
    if let Some(index) = hovered_slot.filter(|_| state.value_drag.is_none()) {
        if let Some(value) = values.get(index) {
            track_response.on_hover_text(format!(
                "{}  {}",
                slot_clock_label(index, data.interval_duration_minutes),
                display_value(*value, data.interval_type, t)
            ));
        }
    }

    committed
}

/// On/off labels go through the string table, numbers do not
fn display_value(value: f64, interval_type: IntervalType, t: &dyn Translate) -> String {
    let text = format_value(value, interval_type);
    match interval_type {
        IntervalType::OnOff => t.t(&text),
        IntervalType::Temperature | IntervalType::Percent => text,
    }
}

/// Header, type/interval/priority pickers, members and days of the selected profile
pub fn render_details(
    ui: &mut Ui,
    node: &ProfileNode,
    data: &ProfileData,
    config: &Config,
    members_text: &mut String,
    t: &dyn Translate,
) -> Option<DetailAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new(&node.title).heading().strong());
        ui.add_space(12.0);
        let (icon, label) = if data.enabled {
            (icons::TOGGLE_RIGHT, "Enabled")
        } else {
            (icons::TOGGLE_LEFT, "Disabled")
        };
        if painted_button(ui, &format!("{icon} {}", t.t(label)), true) {
            action = Some(DetailAction::ToggleEnabled);
        }
    });
    ui.add_space(8.0);

    egui::Grid::new("profile_details")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            ui.label(t.t("Type"));
            ui.horizontal(|ui| {
                for interval_type in IntervalType::ALL {
                    let current = data.interval_type == interval_type;
                    if ui.radio(current, t.t(interval_type.key())).clicked() && !current {
                        action = Some(DetailAction::IntervalType(interval_type));
                    }
                }
            });
            ui.end_row();

            ui.label(t.t("Interval"));
            ui.horizontal_wrapped(|ui| {
                for minutes in valid_durations() {
                    let current = data.interval_duration_minutes == minutes;
                    let label = format!("{minutes} {}", t.t("minutes"));
                    if ui.selectable_label(current, label).clicked() && !current {
                        action = Some(DetailAction::Duration(minutes));
                    }
                }
            });
            ui.end_row();

            ui.label(t.t("Priority"));
            ui.horizontal(|ui| {
                for priority in Priority::ALL {
                    let current = data.priority == priority;
                    let text = RichText::new(t.t(priority.key())).color(priority_color(priority));
                    if ui.radio(current, text).clicked() && !current {
                        action = Some(DetailAction::Priority(priority));
                    }
                }
            });
            ui.end_row();

            ui.label(t.t("Members"));
            let edit = ui.add(
                egui::TextEdit::singleline(members_text)
                    .hint_text("hm-rpc.0.ABC123, hm-rpc.0.DEF456")
                    .desired_width(400.0),
            );
            if edit.lost_focus() {
                let members: Vec<String> = members_text
                    .split(',')
                    .map(|member| member.trim().to_string())
                    .filter(|member| !member.is_empty())
                    .collect();
                if members != data.members {
                    action = Some(DetailAction::Members(members));
                }
            }
            ui.end_row();

            ui.label("");
            let panel = DayOfWeekPanel::new(config.week_start, config.holiday_visible(data.interval_type));
            if let Some(toggle) = panel.render(ui, data.days_of_week, data.holiday, t) {
                action = Some(DetailAction::Day(toggle));
            }
            ui.end_row();
        });

    action
}

/// Modal add / edit / duplicate window
pub fn render_node_dialog(
    ctx: &egui::Context,
    dialog: &mut NodeDialog,
    profiles: &ProfileCollection,
    t: &dyn Translate,
) -> Option<DialogOutcome> {
    let mut outcome = None;
    let (heading, submit_label) = dialog.labels();
    let title = format!("{} {}", t.t(heading), t.t(dialog.kind(profiles).key()));

    let (content_bg, frame_color, _) = dialog_colors();
    let dialog_frame = egui::Frame::none()
        .fill(content_bg)
        .stroke(Stroke::new(2.0, frame_color))
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::Margin::same(20.0));

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(dialog_frame)
        .show(ctx, |ui| {
            ui.set_min_width(360.0);
            ui.label(t.t("Name"));
            let edit = ui.add(egui::TextEdit::singleline(&mut dialog.title).desired_width(f32::INFINITY));
            let can_submit = dialog.can_submit(profiles);
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && can_submit {
                outcome = Some(DialogOutcome::Submit);
            }
            if dialog.title_taken(profiles) {
                ui.label(RichText::new(t.t("Name already used")).color(Color32::from_rgb(0xe5, 0x4d, 0x42)));
            }

            ui.add_space(16.0);
            ui.horizontal(|ui| {
                if painted_button(ui, &t.t(submit_label), can_submit) {
                    outcome = Some(DialogOutcome::Submit);
                }
                if dialog.can_delete() && painted_button(ui, &format!("{} {}", icons::TRASH, t.t("Delete")), true) {
                    outcome = Some(DialogOutcome::Delete);
                }
                if painted_button(ui, &t.t("Cancel"), true) {
                    outcome = Some(DialogOutcome::Cancel);
                }
            });
        });

    if outcome.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        outcome = Some(DialogOutcome::Cancel);
    }
    outcome
}
