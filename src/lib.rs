pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;
pub mod session;
pub mod settings;
pub mod ui;
pub mod views;

pub use error::{AppError, Result};
