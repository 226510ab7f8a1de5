//! Settings panel: categorized hospital configuration with branch scope.

use chrono::{NaiveTime, Timelike};
use eframe::egui::{self, Align, Color32, CornerRadius, Layout, Margin, RichText, Sense, Ui};
use egui_phosphor::regular::{CARET_DOWN, CARET_RIGHT, FLOPPY_DISK, MAGNIFYING_GLASS, X};

use super::app::App;
use super::components::{back_button, colors, panel_header, primary_button};
use crate::models::{BranchScope, SettingCategory, SettingItem, SettingKind, SettingValue};
use crate::views::BannerKind;

/// A field change collected during rendering.
struct Edit {
    category_id: String,
    item_id: String,
    value: SettingValue,
}

/// Show the settings panel.
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "Hospital Settings");

    if app.settings.has_unsaved_changes() || app.settings.is_saving() {
        egui::TopBottomPanel::bottom("settings_save_bar")
            .frame(egui::Frame::new().inner_margin(Margin::symmetric(0, 8)))
            .show_inside(ui, |ui| save_bar(app, ui));
    }

    show_banner(app, ui);
    toolbar(app, ui);

    ui.add_space(10.0);

    let mut edits = Vec::new();
    let mut toggles = Vec::new();

    egui::ScrollArea::vertical().id_salt("settings_scroll").show(ui, |ui| {
        let visible = app.settings.visible_categories();

        if app.settings.categories().is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.spinner();
            });
        } else if visible.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(RichText::new("No settings match your search").weak().size(16.0));
            });
        }

        for category in visible {
            if category_header(app, ui, category) {
                toggles.push(category.id.clone());
            }

            if app.settings.is_expanded(&category.id) {
                category_body(app, ui, category, &mut edits);
            }

            ui.add_space(8.0);
        }
    });

    for id in toggles {
        app.settings.toggle(&id);
    }

    for edit in edits {
        if let Err(e) = app.settings.edit(&edit.category_id, &edit.item_id, edit.value) {
            app.log_warning(format!("Setting not changed: {e}"));
        }
    }

    go_back
}

/// Search box, expand/collapse buttons and branch selector.
fn toolbar(app: &mut App, ui: &mut Ui) {
    let mut picked_scope = None;
    let mut retry_branches = false;

    ui.horizontal(|ui| {
        ui.label(MAGNIFYING_GLASS);
        ui.add(
            egui::TextEdit::singleline(app.settings.search_mut())
                .hint_text("Search settings...")
                .desired_width(250.0),
        );

        ui.add_space(10.0);

        if ui.button("Expand All").clicked() {
            app.settings.expand_all();
        }
        if ui.button("Collapse All").clicked() {
            app.settings.collapse_all();
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            egui::ComboBox::from_id_salt("settings_branch_scope")
                .selected_text(app.settings.scope_label())
                .width(220.0)
                .show_ui(ui, |ui| {
                    let current = app.settings.scope();
                    if ui
                        .selectable_label(*current == BranchScope::All, "All Branches")
                        .clicked()
                    {
                        picked_scope = Some(BranchScope::All);
                    }
                    for branch in app.settings.branches() {
                        let scope = BranchScope::Branch(branch.id.clone());
                        let text = format!("{} ({})", branch.name, branch.location);
                        if ui.selectable_label(*current == scope, text).clicked() {
                            picked_scope = Some(scope);
                        }
                    }
                });
            ui.label("Apply to:");

            if let Some(error) = app.settings.branches_error() {
                if ui.small_button("Retry").clicked() {
                    retry_branches = true;
                }
                ui.label(RichText::new(error).small().color(colors::WARNING));
            }
        });
    });

    if let Some(scope) = picked_scope {
        app.settings.select_scope(scope);
        let label = app.settings.scope_label();
        app.log_info(format!("Settings scope: {label}"));
    }
    if retry_branches {
        app.load_branches();
    }
}

/// Success or error message above the categories.
fn show_banner(app: &mut App, ui: &mut Ui) {
    let Some(banner) = app.settings.banner() else {
        return;
    };

    let color = match banner.kind {
        BannerKind::Success => colors::SUCCESS,
        BannerKind::Error => colors::ERROR,
    };

    let mut dismiss = false;
    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .inner_margin(Margin::same(10))
        .corner_radius(CornerRadius::same(6))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.colored_label(color, &banner.message);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button(X).clicked() {
                        dismiss = true;
                    }
                });
            });
        });
    ui.add_space(10.0);

    if dismiss {
        app.settings.dismiss_banner();
    }
}

/// Sticky bar with the pending change count and save/cancel buttons.
fn save_bar(app: &mut App, ui: &mut Ui) {
    ui.separator();
    ui.horizontal(|ui| {
        let saving = app.settings.is_saving();

        if saving {
            ui.spinner();
            ui.label("Saving...");
        } else {
            let count = app.settings.dirty_count();
            ui.colored_label(colors::WARNING, format!("You have {count} unsaved change(s)"));
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let text = format!("{FLOPPY_DISK} Save Changes");
            if primary_button(ui, !saving, &text).clicked() {
                app.save_settings();
            }
            if ui.add_enabled(!saving, egui::Button::new("Cancel")).clicked() {
                app.cancel_settings();
            }
        });
    });
}

/// Clickable category header. Returns `true` when clicked.
fn category_header(app: &App, ui: &mut Ui, category: &SettingCategory) -> bool {
    let [r, g, b] = category.accent;
    let accent = Color32::from_rgb(r, g, b);
    let expanded = app.settings.is_expanded(&category.id);
    let unsaved = category
        .items
        .iter()
        .filter(|i| app.settings.is_dirty(&category.id, &i.id))
        .count();

    let frame = egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(12))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(&category.icon).size(22.0).color(accent));
                ui.add_space(6.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(&category.title).size(16.0).strong());
                    ui.label(RichText::new(&category.description).small().weak());
                });

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(if expanded { CARET_DOWN } else { CARET_RIGHT });
                    if unsaved > 0 {
                        ui.label(RichText::new(format!("{unsaved} unsaved")).small().color(colors::WARNING));
                    }
                });
            });
        });

    frame.response.interact(Sense::click()).clicked()
}

/// Editor grid of one expanded category.
fn category_body(app: &App, ui: &mut Ui, category: &SettingCategory, edits: &mut Vec<Edit>) {
    egui::Frame::new()
        .inner_margin(Margin::symmetric(24, 8))
        .show(ui, |ui| {
            egui::Grid::new(format!("settings_grid_{}", category.id))
                .num_columns(2)
                .spacing([20.0, 10.0])
                .min_col_width(180.0)
                .show(ui, |ui| {
                    for item in &category.items {
                        ui.vertical(|ui| {
                            ui.horizontal(|ui| {
                                ui.label(&item.label);
                                if app.settings.is_dirty(&category.id, &item.id) {
                                    ui.colored_label(colors::WARNING, "*");
                                }
                            });
                            if let Some(help) = &item.help {
                                ui.label(RichText::new(help).small().weak());
                            }
                        });

                        let id = format!("{}.{}", category.id, item.id);
                        if let Some(value) = field_editor(ui, &id, item) {
                            edits.push(Edit {
                                category_id: category.id.clone(),
                                item_id: item.id.clone(),
                                value,
                            });
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Widget for one field. Returns the new value when the user changed it.
fn field_editor(ui: &mut Ui, id: &str, item: &SettingItem) -> Option<SettingValue> {
    match (item.kind, &item.value) {
        (SettingKind::Text, SettingValue::Text(text)) => {
            let mut text = text.clone();
            let response = ui.add(egui::TextEdit::singleline(&mut text).id_salt(id).desired_width(280.0));
            response.changed().then_some(SettingValue::Text(text))
        }
        (SettingKind::Textarea, SettingValue::Text(text)) => {
            let mut text = text.clone();
            let response = ui.add(
                egui::TextEdit::multiline(&mut text)
                    .id_salt(id)
                    .desired_rows(3)
                    .desired_width(280.0),
            );
            response.changed().then_some(SettingValue::Text(text))
        }
        (SettingKind::Select, SettingValue::Text(current)) => {
            let mut picked = None;
            egui::ComboBox::from_id_salt(id)
                .selected_text(current.as_str())
                .width(200.0)
                .show_ui(ui, |ui| {
                    for option in item.options.iter().flatten() {
                        if ui.selectable_label(option == current, option).clicked() {
                            picked = Some(option.clone());
                        }
                    }
                });
            picked
                .filter(|p| p != current)
                .map(SettingValue::Text)
        }
        (SettingKind::Toggle, SettingValue::Bool(on)) => {
            let mut on = *on;
            let text = if on { "Enabled" } else { "Disabled" };
            ui.checkbox(&mut on, text).changed().then_some(SettingValue::Bool(on))
        }
        (SettingKind::Number, SettingValue::Number(n)) => {
            let mut n = *n;
            ui.add(egui::DragValue::new(&mut n).speed(1.0))
                .changed()
                .then_some(SettingValue::Number(n))
        }
        (SettingKind::Date, SettingValue::Date(date)) => {
            let mut date = *date;
            ui.add(egui_extras::DatePickerButton::new(&mut date).id_salt(id))
                .changed()
                .then_some(SettingValue::Date(date))
        }
        (SettingKind::Time, SettingValue::Time(time)) => time_editor(ui, *time).map(SettingValue::Time),
        _ => {
            ui.label(RichText::new(item.value.display()).weak());
            None
        }
    }
}

/// Hour and minute spinners.
fn time_editor(ui: &mut Ui, time: NaiveTime) -> Option<NaiveTime> {
    let mut hour = time.hour();
    let mut minute = time.minute();

    let changed = ui
        .horizontal(|ui| {
            let h = ui.add(egui::DragValue::new(&mut hour).range(0..=23).custom_formatter(|v, _| format!("{v:02}")));
            ui.label(":");
            let m = ui.add(egui::DragValue::new(&mut minute).range(0..=59).custom_formatter(|v, _| format!("{v:02}")));
            h.changed() || m.changed()
        })
        .inner;

    if changed {
        NaiveTime::from_hms_opt(hour, minute, 0).filter(|t| *t != time)
    } else {
        None
    }
}
