//! Data models for appointments, dashboard stats, identity and settings.

pub mod appointment;
pub mod identity;
pub mod settings;
pub mod stats;

pub use appointment::{AppointmentList, AppointmentRecord, AppointmentStatus, PaymentStatus};
pub use identity::{USER_KEY, UserIdentity};
pub use settings::{
    Branch, BranchList, BranchScope, SettingCategory, SettingChange, SettingItem, SettingKind, SettingValue,
    SettingsUpdate,
};
pub use stats::{DashboardStats, StatsResponse};
