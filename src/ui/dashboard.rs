//! Dashboard panel with greeting, stat cards, navigation cards, and activity log.

use eframe::egui::load::TexturePoll;
use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Sense, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CALENDAR_CHECK, GEAR};

use super::app::{App, LogLevel, Panel};
use super::components::{colors, dashboard_card, skeleton_card, stat_card};

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;

    ScrollArea::vertical().show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(30.0);

            // Header
            identity_header(app, ui);
            ui.add_space(5.0);
            ui.label(RichText::new("Hospital Super Admin").size(14.0).weak());

            ui.add_space(30.0);

            // Stat cards, two rows of three
            let loading = app.dashboard.is_loading();
            let cards = app.dashboard.cards();
            for row in cards.chunks(3) {
                ui.horizontal(|ui| {
                    let available = ui.available_width();
                    let start_offset = ((available - 540.0) / 2.0).max(0.0);
                    ui.add_space(start_offset);

                    for card in row {
                        if loading {
                            skeleton_card(ui);
                        } else {
                            stat_card(ui, card.title, &card.value, card.caption);
                        }
                    }
                });
            }

            ui.add_space(30.0);

            // Navigation cards row
            let available = ui.available_width();
            let num_cards = 2.0;
            let spacing = 30.0;
            let total_spacing = spacing * (num_cards - 1.0);
            let card_width = ((available - total_spacing) / num_cards).clamp(150.0, 250.0);
            let card_height = card_width * 0.75;
            let card_size = egui::vec2(card_width, card_height);
            let total_width = card_width * num_cards + total_spacing;
            let start_offset = ((available - total_width) / 2.0).max(0.0);

            ui.horizontal(|ui| {
                ui.add_space(start_offset);

                if dashboard_card(ui, "Appointments", "All branches, all doctors", CALENDAR_CHECK, card_size)
                    .clicked()
                {
                    next_panel = Some(Panel::Appointments);
                }

                ui.add_space(spacing);

                if dashboard_card(ui, "Settings", "Hospital configuration", GEAR, card_size).clicked() {
                    next_panel = Some(Panel::Settings);
                }
            });

            ui.add_space(30.0);
        });

        // Two-column layout: Quick Actions | Recent Activity
        let available_width = ui.available_width();
        let column_width = (available_width - 40.0) / 2.0;

        ui.horizontal(|ui| {
            ui.add_space(10.0);

            // Left column - Quick Actions
            ui.vertical(|ui| {
                ui.set_width(column_width);

                egui::Frame::new()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .inner_margin(Margin::same(15))
                    .corner_radius(CornerRadius::same(8))
                    .show(ui, |ui| {
                        ui.set_min_width(column_width - 30.0);

                        ui.label(RichText::new("Quick Actions").strong());
                        ui.add_space(10.0);

                        ui.add_enabled_ui(!app.dashboard.is_loading(), |ui| {
                            if ui.button(format!("{ARROWS_CLOCKWISE} Refresh Stats")).clicked() {
                                app.load_stats();
                            }
                        });

                        ui.add_space(5.0);

                        if ui.button("Test Backend Connection").clicked() {
                            app.test_connection();
                        }
                    });
            });

            ui.add_space(20.0);

            // Right column - Recent Activity
            ui.vertical(|ui| {
                ui.set_width(column_width);

                egui::Frame::new()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .inner_margin(Margin::same(15))
                    .corner_radius(CornerRadius::same(8))
                    .show(ui, |ui| {
                        ui.set_min_width(column_width - 30.0);

                        ui.label(RichText::new("Recent Activity").strong());
                        ui.add_space(10.0);

                        ScrollArea::vertical()
                            .id_salt("recent_activity")
                            .max_height(150.0)
                            .show(ui, |ui| {
                                if app.log_messages.is_empty() {
                                    ui.label(RichText::new("No recent activity").weak());
                                } else {
                                    for entry in app.log_messages.iter().rev().take(10) {
                                        let color = match entry.level {
                                            LogLevel::Info => Color32::GRAY,
                                            LogLevel::Success => colors::SUCCESS,
                                            LogLevel::Warning => colors::WARNING,
                                            LogLevel::Error => colors::ERROR,
                                        };

                                        ui.horizontal(|ui| {
                                            ui.label(
                                                RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                                    .small()
                                                    .color(Color32::DARK_GRAY),
                                            );
                                            ui.label(RichText::new(&entry.message).color(color));
                                        });
                                    }
                                }
                            });
                    });
            });
        });

        ui.add_space(20.0);
    });

    next_panel
}

/// Avatar (profile picture, or initials while it loads or when absent)
/// followed by the welcome line.
fn identity_header(app: &App, ui: &mut Ui) {
    let identity = app.dashboard.identity();
    let initials = identity.initials();

    ui.horizontal(|ui| {
        let greeting = app.dashboard.greeting();
        let text_width = greeting.len() as f32 * 15.0;
        let start_offset = ((ui.available_width() - text_width - 60.0) / 2.0).max(0.0);
        ui.add_space(start_offset);

        let size = egui::vec2(AVATAR_SIZE, AVATAR_SIZE);
        let picture = identity
            .avatar_url()
            .map(|url| egui::Image::from_uri(url).fit_to_exact_size(size).corner_radius(AVATAR_SIZE / 2.0));
        let ready = picture
            .as_ref()
            .is_some_and(|image| matches!(image.load_for_size(ui.ctx(), size), Ok(TexturePoll::Ready { .. })));

        match picture {
            Some(image) if ready => {
                ui.add(image);
                ui.add_space(10.0);
            }
            _ if !initials.is_empty() => {
                initials_avatar(ui, &initials);
                ui.add_space(10.0);
            }
            _ => {}
        }

        ui.label(RichText::new(greeting).size(32.0).strong());
    });
}

const AVATAR_SIZE: f32 = 44.0;

fn initials_avatar(ui: &mut Ui, initials: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(AVATAR_SIZE, AVATAR_SIZE), Sense::hover());
    ui.painter().circle_filled(rect.center(), AVATAR_SIZE / 2.0, colors::INFO);
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials,
        egui::FontId::proportional(18.0),
        Color32::WHITE,
    );
}
