use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::model::{IntervalType, Priority};

/// Font family for filled Phosphor icons
pub fn phosphor_fill_family() -> FontFamily {
    FontFamily::Name("phosphor-fill".into())
}

pub fn setup_fonts(ctx: &egui::Context) {
    ctx.set_fonts(font_definitions());
}

fn font_definitions() -> egui::FontDefinitions {
    let mut fonts = egui::FontDefinitions::default();

    // Phosphor Regular icons as fallback in the Proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    // Phosphor Fill as a separate family, with the default UI font behind it
    fonts.font_data.insert(
        "phosphor-fill".into(),
        egui_phosphor::Variant::Fill.font_data(),
    );
    let mut fill_family = vec!["phosphor-fill".to_owned()];
    if let Some(proportional) = fonts.families.get(&FontFamily::Proportional) {
        fill_family.extend(proportional.iter().cloned());
    }
    fonts.families.insert(phosphor_fill_family(), fill_family);
    fonts
}

pub fn setup_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::dark();

    let bg = Color32::BLACK;
    visuals.panel_fill = bg;
    visuals.window_fill = bg;
    visuals.faint_bg_color = Color32::from_rgb(20, 20, 18);
    visuals.extreme_bg_color = bg;

    // Warm grays (R=G > B)
    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(40, 40, 38);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(176, 176, 168));

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(56, 56, 52);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(200, 200, 192));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(80, 80, 74);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.widgets.active.bg_fill = accent();
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.selection.bg_fill = accent();
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = accent();

    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(16.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(16.0);

    ctx.set_style(style);
}

pub fn accent() -> Color32 {
    Color32::from_rgb(19, 152, 244)
}

/// Bar fill per interval type
pub fn bar_color(interval_type: IntervalType) -> Color32 {
    match interval_type {
        IntervalType::Temperature => Color32::from_rgb(0xe0, 0x6c, 0x4c),
        IntervalType::Percent => accent(),
        IntervalType::OnOff => Color32::from_rgb(0x65, 0xba, 0x43),
    }
}

/// Returns (bg_color, border_color, hover_color) for timeline slots
pub fn slot_colors(selected: bool) -> (Color32, Color32, Color32) {
    if selected {
        (
            Color32::from_rgb(14, 40, 64),     // bg - dim accent
            accent(),
            Color32::from_rgb(24, 60, 92),
        )
    } else {
        (
            Color32::from_rgb(20, 20, 18),
            Color32::from_rgb(56, 56, 52),     // border - warm gray
            Color32::from_rgb(40, 40, 38),
        )
    }
}

pub fn priority_color(priority: Priority) -> Color32 {
    match priority {
        Priority::Normal => Color32::from_rgb(112, 112, 104),
        Priority::High => Color32::from_rgb(0xe5, 0xc0, 0x7b),
        Priority::Highest => Color32::from_rgb(0xe5, 0x4d, 0x42),
    }
}

/// Returns (row_bg, text_color) for tree rows
pub fn tree_row_colors(active: bool, drop_target: bool) -> (Color32, Color32) {
    if drop_target {
        (Color32::from_rgb(14, 40, 64), Color32::WHITE)
    } else if active {
        (Color32::from_rgb(56, 56, 52), Color32::WHITE)
    } else {
        (Color32::TRANSPARENT, Color32::from_rgb(200, 200, 192))
    }
}

/// Returns (content_bg, frame_color, frame_text) for dialogs
pub fn dialog_colors() -> (Color32, Color32, Color32) {
    (
        Color32::BLACK,                      // content bg
        Color32::from_rgb(40, 40, 38),       // frame/border - warm gray
        Color32::from_rgb(176, 176, 168),    // frame text - warm gray
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_family_puts_filled_icons_before_ui_font() {
        let fonts = font_definitions();
        let family = fonts.families.get(&phosphor_fill_family()).expect("fill family");
        assert_eq!(family.first().map(String::as_str), Some("phosphor-fill"));
        assert!(family.len() > 1);
        assert!(fonts.font_data.contains_key("phosphor-fill"));
    }
}
