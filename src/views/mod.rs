//! GUI-independent state of the three panels.

pub mod appointments;
pub mod dashboard;
pub mod settings;

pub use appointments::{AppointmentListView, StatusClass, payment_class, status_class};
pub use dashboard::{DashboardStatsView, StatCard};
pub use settings::{Banner, BannerKind, SettingsEditorView};
