//! Shared UI components.

use eframe::egui::{self, Color32, CornerRadius, Margin, Response, RichText, Sense, StrokeKind, Ui};

use crate::views::StatusClass;

/// Render a clickable dashboard card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn dashboard_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);

        // Scale factor based on width (200 is the reference size)
        let scale = size.x / 200.0;

        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        let icon_pos = egui::pos2(rect.center().x, rect.top() + size.y * 0.23);
        ui.painter().text(
            icon_pos,
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(36.0 * scale),
            visuals.text_color(),
        );

        let title_pos = egui::pos2(rect.center().x, rect.center().y + size.y * 0.07);
        ui.painter().text(
            title_pos,
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(18.0 * scale),
            visuals.text_color(),
        );

        let desc_pos = egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17);
        ui.painter().text(
            desc_pos,
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(12.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Render a stat card with title, value, and caption.
pub fn stat_card(ui: &mut Ui, title: &str, value: &str, caption: &str) {
    card_frame(ui).show(ui, |ui| {
        ui.set_min_width(160.0);
        ui.vertical(|ui| {
            ui.label(RichText::new(title).small());
            ui.label(RichText::new(value).heading().strong());
            ui.label(RichText::new(caption).small().weak());
        });
    });
}

/// Placeholder card shown while stats are loading.
pub fn skeleton_card(ui: &mut Ui) {
    card_frame(ui).show(ui, |ui| {
        ui.set_min_width(160.0);
        ui.vertical(|ui| {
            for (width, height) in [(70.0, 10.0), (110.0, 22.0), (90.0, 10.0)] {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
                ui.painter().rect_filled(rect, 3.0, ui.visuals().faint_bg_color);
                ui.add_space(4.0);
            }
        });
    });
}

fn card_frame(ui: &Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
}

/// Colored pill with the given text.
pub fn status_badge(ui: &mut Ui, text: &str, class: StatusClass) -> Response {
    let color = colors::for_class(class);
    egui::Frame::new()
        .fill(color.gamma_multiply(0.2))
        .inner_margin(Margin::symmetric(8, 2))
        .corner_radius(CornerRadius::same(10))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(color));
        })
        .response
}

/// Status indicator colors.
pub mod colors {
    use super::{Color32, StatusClass};

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const INFO: Color32 = Color32::from_rgb(100, 150, 230);

    /// Badge color of a status class.
    pub fn for_class(class: StatusClass) -> Color32 {
        match class {
            StatusClass::Success => SUCCESS,
            StatusClass::Warning => WARNING,
            StatusClass::Danger => ERROR,
            StatusClass::Neutral => NEUTRAL,
        }
    }
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back to Dashboard").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Button with a leading phosphor icon.
pub fn icon_button(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.button(format!("{icon} {text}"))
}

/// Filled accent button for the main action of a view.
pub fn primary_button(ui: &mut Ui, enabled: bool, text: &str) -> Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(text).color(Color32::WHITE)).fill(colors::INFO),
    )
}
