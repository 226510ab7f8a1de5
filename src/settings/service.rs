//! Configuration service consumed by the settings editor.

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Branch, BranchScope, SettingCategory, SettingsUpdate};

use super::catalog::{default_branches, default_categories};

/// Source and sink of hospital configuration.
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Categories (with current values) for a scope.
    async fn read_categories(&self, scope: &BranchScope) -> Result<Vec<SettingCategory>>;

    /// Branches available for scoping.
    async fn read_branches(&self) -> Result<Vec<Branch>>;

    /// Persist changed values.
    async fn save(&self, update: &SettingsUpdate) -> Result<()>;
}

/// In-memory catalog; saves are only acknowledged.
#[derive(Debug, Default)]
pub struct LocalSettingsService;

#[async_trait]
impl SettingsService for LocalSettingsService {
    async fn read_categories(&self, _scope: &BranchScope) -> Result<Vec<SettingCategory>> {
        Ok(default_categories())
    }

    async fn read_branches(&self) -> Result<Vec<Branch>> {
        Ok(default_branches())
    }

    async fn save(&self, update: &SettingsUpdate) -> Result<()> {
        tracing::info!(
            "Settings saved locally for branch '{}': {} change(s)",
            update.branch,
            update.changes.len()
        );
        for change in &update.changes {
            tracing::debug!("  {}.{} = {}", change.category_id, change.item_id, change.value.display());
        }
        Ok(())
    }
}

/// Built-in catalog with branches and updates going through the REST API.
pub struct RemoteSettingsService {
    client: ApiClient,
}

impl RemoteSettingsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SettingsService for RemoteSettingsService {
    async fn read_categories(&self, _scope: &BranchScope) -> Result<Vec<SettingCategory>> {
        // No read endpoint exists; the catalog carries the defaults.
        Ok(default_categories())
    }

    async fn read_branches(&self) -> Result<Vec<Branch>> {
        self.client.fetch_branches().await
    }

    async fn save(&self, update: &SettingsUpdate) -> Result<()> {
        self.client.update_settings(update).await
    }
}
