//! Hospital configuration catalog and the service that reads and writes it.

pub mod catalog;
pub mod service;

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::SettingsBackend;

pub use catalog::{default_branches, default_categories};
pub use service::{LocalSettingsService, RemoteSettingsService, SettingsService};

/// Build the configured settings service.
pub fn make_service(backend: SettingsBackend, client: &ApiClient) -> Arc<dyn SettingsService> {
    match backend {
        SettingsBackend::Local => Arc::new(LocalSettingsService),
        SettingsBackend::Remote => Arc::new(RemoteSettingsService::new(client.clone())),
    }
}
