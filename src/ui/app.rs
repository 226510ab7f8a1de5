//! Main application UI.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::client::ApiClient;
use crate::config::{AppConfig, StartPanel};
use crate::error::{AppError, Result};
use crate::export;
use crate::loader::RequestToken;
use crate::models::{AppointmentList, Branch, SettingCategory, StatsResponse};
use crate::session::LocalStore;
use crate::settings::{self, SettingsService};
use crate::views::{AppointmentListView, DashboardStatsView, SettingsEditorView};

use super::components::colors;
use super::{appointments_panel, dashboard, settings_panel};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    Appointments,
    Settings,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::Appointments => "Appointments",
            Panel::Settings => "Settings",
        }
    }
}

impl From<StartPanel> for Panel {
    fn from(start: StartPanel) -> Self {
        match start {
            StartPanel::Dashboard => Panel::Dashboard,
            StartPanel::Appointments => Panel::Appointments,
            StartPanel::Settings => Panel::Settings,
        }
    }
}

/// Backend reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Checking,
    Online,
    Offline,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    AppointmentsLoaded(RequestToken, Result<AppointmentList>),
    StatsLoaded(RequestToken, Result<StatsResponse>),
    BranchesLoaded(RequestToken, Result<Vec<Branch>>),
    CategoriesLoaded(RequestToken, Result<Vec<SettingCategory>>),
    SettingsSaved(Result<usize>),
    ConnectionTested(bool),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Main application state.
pub struct App {
    // Runtime and backend
    pub rt: tokio::runtime::Runtime,
    pub client: ApiClient,
    pub settings_service: Arc<dyn SettingsService>,
    pub store: LocalStore,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,
    mounted_panel: Option<Panel>,

    // Panel state
    pub appointments: AppointmentListView,
    pub dashboard: DashboardStatsView,
    pub settings: SettingsEditorView,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,

    // Dialogs
    pub error_message: Option<String>,
    pub success_message: Option<String>,

    pub connection_status: ConnectionStatus,
}

impl App {
    pub fn new(config: AppConfig, rt: tokio::runtime::Runtime, startup_error: Option<String>) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(&config.api)?;
        let settings_service = settings::make_service(config.settings.backend, &client);
        let store = LocalStore::new(config.session_path());
        let identity = store.load_identity();
        let banner_duration = std::time::Duration::from_secs(config.ui.banner_secs);

        tracing::info!(
            "Backend: {} (settings backend: {:?})",
            client.base_url(),
            config.settings.backend
        );

        let mut app = Self {
            rt,
            client,
            settings_service,
            store,
            tx,
            rx,
            current_panel: Panel::from(config.ui.start_panel),
            mounted_panel: None,
            appointments: AppointmentListView::new(),
            dashboard: DashboardStatsView::new(identity),
            settings: SettingsEditorView::new(Vec::new(), banner_duration),
            log_messages: Vec::new(),
            config,
            error_message: startup_error,
            success_message: None,
            connection_status: ConnectionStatus::Unknown,
        };

        app.log_info("Super Admin console started");
        Ok(app)
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log a warning message.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Switch panels; the new panel fetches its data on the next frame.
    pub fn navigate(&mut self, panel: Panel) {
        self.current_panel = panel;
    }

    /// Fetch data for a panel the first frame it is shown.
    fn mount_current_panel(&mut self) {
        if self.mounted_panel == Some(self.current_panel) {
            return;
        }
        self.mounted_panel = Some(self.current_panel);
        tracing::debug!("Mounting panel {}", self.current_panel.name());

        match self.current_panel {
            Panel::Dashboard => self.load_stats(),
            Panel::Appointments => self.load_appointments(),
            Panel::Settings => {
                if self.settings.categories().is_empty() && !self.settings.is_catalog_loading() {
                    self.load_categories();
                }
                self.load_branches();
            }
        }
    }

    /// Load (or reload) the appointment list.
    pub fn load_appointments(&mut self) {
        let token = self.appointments.begin_refresh();
        let client = self.client.clone();
        let tx = self.tx.clone();

        let handle = self.rt.spawn(async move {
            let result = client.fetch_appointments().await;
            let _ = tx.send(UiMessage::AppointmentsLoaded(token, result));
        });
        self.appointments.track(handle.abort_handle());
    }

    /// Load dashboard counters and re-read the cached identity.
    pub fn load_stats(&mut self) {
        self.dashboard.set_identity(self.store.load_identity());

        let token = self.dashboard.begin_load();
        let client = self.client.clone();
        let tx = self.tx.clone();

        let handle = self.rt.spawn(async move {
            let result = client.fetch_dashboard_stats().await;
            let _ = tx.send(UiMessage::StatsLoaded(token, result));
        });
        self.dashboard.track(handle.abort_handle());
    }

    /// Load the branch list for the scope selector.
    pub fn load_branches(&mut self) {
        let token = self.settings.begin_branch_load();
        let service = self.settings_service.clone();
        let tx = self.tx.clone();

        let handle = self.rt.spawn(async move {
            let result = service.read_branches().await;
            let _ = tx.send(UiMessage::BranchesLoaded(token, result));
        });
        self.settings.track_branches(handle.abort_handle());
    }

    /// Load the settings catalog for the current scope.
    pub fn load_categories(&mut self) {
        let token = self.settings.begin_catalog_load();
        let scope = self.settings.scope().clone();
        let service = self.settings_service.clone();
        let tx = self.tx.clone();

        let handle = self.rt.spawn(async move {
            let result = service.read_categories(&scope).await;
            let _ = tx.send(UiMessage::CategoriesLoaded(token, result));
        });
        self.settings.track_catalog(handle.abort_handle());
    }

    /// Send edited settings through the settings service.
    pub fn save_settings(&mut self) {
        let Some(update) = self.settings.prepare_save() else {
            return;
        };

        self.log_info(format!(
            "Saving {} setting(s) for {}",
            update.changes.len(),
            self.settings.scope_label()
        ));

        let service = self.settings_service.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let count = update.changes.len();
            let result = service.save(&update).await.map(|()| count);
            let _ = tx.send(UiMessage::SettingsSaved(result));
        });
    }

    /// Discard the unsaved flag.
    pub fn cancel_settings(&mut self) {
        let count = self.settings.dirty_count();
        self.settings.cancel();
        self.log_warning(format!("Discarded {count} unsaved setting change(s)"));
    }

    /// Export the loaded appointments to Excel.
    pub fn export_appointments(&mut self) {
        if self.appointments.rows().is_empty() {
            self.error_message = Some("No appointments to export".to_string());
            return;
        }

        let default_name = export::generate_export_filename("appointments");
        let Some(path) = export::show_save_dialog(&default_name) else {
            return;
        };

        match export::export_appointments_to_excel(self.appointments.rows(), &path) {
            Ok(()) => {
                let shown = path.display().to_string();
                self.success_message = Some(format!("Exported to: {shown}"));
                self.log_success(format!("Exported appointments: {shown}"));
            }
            Err(e) => {
                let e = AppError::from(e);
                self.error_message = Some(format!("Export failed: {e}"));
                self.log_error(format!("Export failed: {e}"));
            }
        }
    }

    /// Test backend connection.
    pub fn test_connection(&mut self) {
        self.log_info("Testing backend connection...");
        self.connection_status = ConnectionStatus::Checking;

        let client = self.client.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let ok = client.test_connection().await.unwrap_or(false);
            let _ = tx.send(UiMessage::ConnectionTested(ok));
        });
    }

    /// Clear the activity log.
    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    /// Any request in flight.
    fn is_busy(&self) -> bool {
        self.appointments.is_loading()
            || self.dashboard.is_loading()
            || self.settings.is_saving()
            || self.settings.is_catalog_loading()
            || matches!(self.connection_status, ConnectionStatus::Checking)
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::AppointmentsLoaded(token, result) => {
                    let failed = result.as_ref().err().map(|e| e.to_string());
                    if self.appointments.apply(token, result) {
                        match failed {
                            Some(e) => self.log_error(format!("Appointments: {e}")),
                            None => {
                                let summary = self.appointments.summary();
                                self.log_info(format!("Appointments loaded ({summary})"));
                            }
                        }
                    }
                }
                UiMessage::StatsLoaded(token, result) => {
                    self.dashboard.apply(token, result);
                }
                UiMessage::BranchesLoaded(token, result) => {
                    self.settings.apply_branches(token, result);
                }
                UiMessage::CategoriesLoaded(token, result) => {
                    if self.settings.apply_categories(token, result)
                        && let Some(e) = self.settings.catalog_error().map(str::to_string)
                    {
                        self.error_message = Some(format!("Failed to load settings: {e}"));
                        self.log_error(format!("Settings catalog: {e}"));
                    }
                }
                UiMessage::SettingsSaved(result) => match result {
                    Ok(count) => {
                        self.settings.save_succeeded(Instant::now());
                        self.log_success(format!("Saved {count} setting(s)"));
                    }
                    Err(e) => {
                        tracing::error!("Failed to save settings: {e}");
                        self.settings
                            .save_failed(format!("Failed to save settings: {e}"), Instant::now());
                        self.log_error(format!("Settings save failed: {e}"));
                    }
                },
                UiMessage::ConnectionTested(ok) => {
                    if ok {
                        self.connection_status = ConnectionStatus::Online;
                        self.log_success("Backend connection successful");
                    } else {
                        self.connection_status = ConnectionStatus::Offline;
                        self.log_error("Backend connection failed");
                    }
                }
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("View", |ui| {
                    for panel in [Panel::Dashboard, Panel::Appointments, Panel::Settings] {
                        if ui
                            .selectable_label(self.current_panel == panel, panel.name())
                            .clicked()
                        {
                            self.navigate(panel);
                            ui.close();
                        }
                    }
                });
                ui.menu_button("Tools", |ui| {
                    let checking = matches!(self.connection_status, ConnectionStatus::Checking);
                    if ui
                        .add_enabled(!checking, egui::Button::new("Test Backend Connection"))
                        .clicked()
                    {
                        self.test_connection();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Clear Activity Log").clicked() {
                        self.clear_log();
                        ui.close();
                    }
                });

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let identity = self.dashboard.identity();
                    let name = identity.display_name();
                    if !name.is_empty() {
                        ui.label(name);
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let (color, text) = match self.connection_status {
                        ConnectionStatus::Unknown => (colors::NEUTRAL, "Not checked"),
                        ConnectionStatus::Checking => (colors::WARNING, "Checking..."),
                        ConnectionStatus::Online => (colors::SUCCESS, "Online"),
                        ConnectionStatus::Offline => (colors::ERROR, "Unreachable"),
                    };

                    if matches!(self.connection_status, ConnectionStatus::Checking) {
                        ui.spinner();
                    }
                    ui.colored_label(color, format!("Backend: {text}"));
                    ui.label(self.client.base_url());

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.is_busy() {
                            ui.spinner();
                            ui.label("Loading...");
                        }
                    });
                });
            });
    }

    /// Render modal dialogs (error, success).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();
        self.mount_current_panel();

        // Banner auto-dismiss
        let now = Instant::now();
        self.settings.expire_banner(now);
        if let Some(left) = self.settings.banner_remaining(now) {
            ctx.request_repaint_after(left);
        }

        if self.is_busy() {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_dialogs(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
            Panel::Dashboard => {
                if let Some(next) = dashboard::show(self, ui) {
                    self.navigate(next);
                }
            }
            Panel::Appointments => {
                if appointments_panel::show(self, ui) {
                    self.navigate(Panel::Dashboard);
                }
            }
            Panel::Settings => {
                if settings_panel::show(self, ui) {
                    self.navigate(Panel::Dashboard);
                }
            }
        });

        // Navigated this frame: mount on the next one
        if self.mounted_panel != Some(self.current_panel) {
            ctx.request_repaint();
        }
    }
}
