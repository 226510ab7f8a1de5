//! GUI panels and application state.

pub mod app;
pub mod appointments_panel;
pub mod components;
pub mod dashboard;
pub mod settings_panel;

pub use app::App;
