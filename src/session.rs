//! Local persisted key-value store, the desktop counterpart of browser local storage.
//!
//! The file is a flat JSON object mapping keys to string values, e.g.
//! `{"user": "{\"first_name\":\"Priya\"}"}`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::identity::{USER_KEY, UserIdentity};

/// JSON-file backed string store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries. Missing file is an empty store.
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| AppError::storage(format!("{}: {e}", self.path.display())))
    }

    /// Get the raw string stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    /// Store `value` under `key`, creating the file if needed.
    ///
    /// Fails without writing if the existing file cannot be parsed, so the
    /// other keys are never dropped.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&entries)
            .map_err(|e| AppError::storage(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Load the cached identity. Never fails: unreadable stores and
    /// malformed blobs both yield an empty identity.
    pub fn load_identity(&self) -> UserIdentity {
        match self.get(USER_KEY) {
            Ok(blob) => UserIdentity::from_blob(blob.as_deref()),
            Err(e) => {
                tracing::debug!("Session store unreadable, using empty identity: {e}");
                UserIdentity::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> LocalStore {
        let path = std::env::temp_dir().join(format!("super-admin-session-{}-{name}.json", std::process::id()));
        std::fs::remove_file(&path).ok();
        LocalStore::new(path)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = temp_store("missing");
        assert_eq!(store.get("user").unwrap(), None);
        assert_eq!(store.load_identity(), UserIdentity::default());
    }

    #[test]
    fn test_set_then_load_identity() {
        let store = temp_store("identity");
        store
            .set(USER_KEY, r#"{"first_name":"Ravi","last_name":"Kumar"}"#)
            .unwrap();

        let identity = store.load_identity();
        assert_eq!(identity.display_name(), "Ravi Kumar");

        std::fs::remove_file(store.path()).ok();
    }

    #[test]
    fn test_corrupt_store_falls_back() {
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "not a json object").unwrap();

        assert!(store.get(USER_KEY).is_err());
        assert_eq!(store.load_identity(), UserIdentity::default());

        std::fs::remove_file(store.path()).ok();
    }

    #[test]
    fn test_set_on_corrupt_store_keeps_file() {
        let store = temp_store("corrupt-set");
        std::fs::write(store.path(), "not a json object").unwrap();

        let err = store.set("theme", "dark").unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "not a json object");

        std::fs::remove_file(store.path()).ok();
    }

    #[test]
    fn test_malformed_user_value_falls_back() {
        let store = temp_store("malformed");
        store.set(USER_KEY, "{{{").unwrap();
        store.set("theme", "dark").unwrap();

        assert_eq!(store.load_identity(), UserIdentity::default());
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        std::fs::remove_file(store.path()).ok();
    }
}
