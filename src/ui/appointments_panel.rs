//! Appointments panel: every appointment across branches.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_XLS};

use super::app::App;
use super::components::{back_button, colors, icon_button, panel_header, status_badge};
use crate::views::{payment_class, status_class};

/// Show the appointments panel.
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let go_back = back_button(ui);
    panel_header(ui, "All Appointments");

    // Toolbar
    ui.horizontal(|ui| {
        let loading = app.appointments.is_loading();

        ui.add_enabled_ui(!loading, |ui| {
            if icon_button(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
                app.load_appointments();
            }
        });

        ui.add_enabled_ui(!loading && !app.appointments.rows().is_empty(), |ui| {
            if icon_button(ui, FILE_XLS, "Export to Excel").clicked() {
                app.export_appointments();
            }
        });

        if loading {
            ui.spinner();
            ui.label("Loading appointments...");
        }
    });

    ui.add_space(10.0);

    if let Some(error) = app.appointments.error() {
        egui::Frame::new()
            .fill(colors::ERROR.gamma_multiply(0.15))
            .inner_margin(egui::Margin::same(10))
            .corner_radius(egui::CornerRadius::same(6))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.colored_label(colors::ERROR, error);
            });
        ui.add_space(10.0);
    }

    show_table(app, ui);

    ui.add_space(10.0);
    ui.separator();
    ui.label(RichText::new(app.appointments.summary()).strong());

    go_back
}

fn show_table(app: &App, ui: &mut Ui) {
    if app.appointments.is_loading() && app.appointments.rows().is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.spinner();
        });
        return;
    }

    if let Some(message) = app.appointments.empty_message() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new(message).weak().size(16.0));
        });
        return;
    }

    ScrollArea::both()
        .id_salt("appointments_scroll")
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("appointments_grid")
                .num_columns(8)
                .striped(true)
                .min_col_width(60.0)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    // Header
                    ui.strong("Patient");
                    ui.strong("Doctor");
                    ui.strong("Branch");
                    ui.strong("Date");
                    ui.strong("Time");
                    ui.strong("Status");
                    ui.strong("Payment");
                    ui.strong("Queue #");
                    ui.end_row();

                    // Data rows
                    for record in app.appointments.rows() {
                        ui.vertical(|ui| {
                            ui.label(&record.patient_name);
                            if !record.patient_id.is_empty() {
                                ui.label(RichText::new(format!("ID: {}", record.patient_id)).small().weak());
                            }
                        });
                        ui.label(&record.doctor_name);
                        ui.label(&record.branch_name);
                        ui.label(&record.date);
                        ui.label(&record.time);
                        status_badge(ui, &record.status.label(), status_class(&record.status));
                        status_badge(
                            ui,
                            &record.payment_status.label(),
                            payment_class(&record.payment_status),
                        );
                        ui.label(
                            record
                                .queue_number
                                .map(|q| q.to_string())
                                .unwrap_or("-".to_string()),
                        );
                        ui.end_row();
                    }
                });
        });
}
