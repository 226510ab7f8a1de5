//! Settings editor view state: expansion, search, dirty tracking, save flow.

use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};

use crate::error::{AppError, Result};
use crate::loader::{Loader, RequestToken};
use crate::models::{Branch, BranchScope, SettingCategory, SettingChange, SettingValue, SettingsUpdate};

/// Confirmation shown after a successful save.
pub const SAVED_MESSAGE: &str = "Settings saved successfully";

/// Kind of banner above the categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Ephemeral message with its display deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub shown_at: Instant,
}

/// State behind the settings panel.
#[derive(Debug)]
pub struct SettingsEditorView {
    categories: Vec<SettingCategory>,
    catalog: Loader<()>,
    expanded: HashSet<String>,
    search: String,
    /// (category id, item id) of edited fields.
    dirty: BTreeSet<(String, String)>,
    scope: BranchScope,
    branches: Loader<Vec<Branch>>,
    /// Changes sent by the save in flight.
    saving: Option<Vec<SettingChange>>,
    banner: Option<Banner>,
    banner_duration: Duration,
}

impl Default for SettingsEditorView {
    fn default() -> Self {
        Self::new(Vec::new(), Duration::from_secs(3))
    }
}

impl SettingsEditorView {
    pub fn new(categories: Vec<SettingCategory>, banner_duration: Duration) -> Self {
        Self {
            categories,
            catalog: Loader::new(),
            expanded: HashSet::new(),
            search: String::new(),
            dirty: BTreeSet::new(),
            scope: BranchScope::All,
            branches: Loader::new(),
            saving: None,
            banner: None,
            banner_duration,
        }
    }

    // ---- catalog ----

    /// Replace the catalog (e.g. after loading from the service).
    /// Pending edits refer to the old values and are dropped.
    pub fn set_categories(&mut self, categories: Vec<SettingCategory>) {
        self.expanded.retain(|id| categories.iter().any(|c| &c.id == id));
        self.categories = categories;
        self.dirty.clear();
    }

    pub fn categories(&self) -> &[SettingCategory] {
        &self.categories
    }

    pub fn begin_catalog_load(&mut self) -> RequestToken {
        self.catalog.begin()
    }

    pub fn track_catalog(&mut self, handle: tokio::task::AbortHandle) {
        self.catalog.track(handle);
    }

    pub fn is_catalog_loading(&self) -> bool {
        self.catalog.is_loading()
    }

    /// Apply a catalog fetch. Returns `false` for stale responses, which
    /// leave the current catalog and its edits untouched.
    pub fn apply_categories(&mut self, token: RequestToken, result: Result<Vec<SettingCategory>>) -> bool {
        if !self.catalog.is_current(token) {
            tracing::debug!("Discarding stale settings catalog");
            return false;
        }

        match result {
            Ok(categories) => {
                self.set_categories(categories);
                self.catalog.complete(token, Ok(()))
            }
            Err(e) => {
                tracing::error!("Failed to load settings catalog: {e}");
                self.catalog.complete(token, Err(e.to_string()))
            }
        }
    }

    pub fn catalog_error(&self) -> Option<&str> {
        self.catalog.error()
    }

    fn category(&self, category_id: &str) -> Option<&SettingCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    // ---- expansion ----

    /// Flip one category between collapsed and expanded.
    pub fn toggle(&mut self, category_id: &str) {
        if !self.expanded.remove(category_id) {
            self.expanded.insert(category_id.to_string());
        }
    }

    pub fn is_expanded(&self, category_id: &str) -> bool {
        self.expanded.contains(category_id)
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.categories.iter().map(|c| c.id.clone()).collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    // ---- search ----

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Mutable access for a text input widget.
    pub fn search_mut(&mut self) -> &mut String {
        &mut self.search
    }

    /// Categories matching the search; all when the query is blank.
    pub fn visible_categories(&self) -> Vec<&SettingCategory> {
        let needle = self.search.trim().to_lowercase();
        self.categories.iter().filter(|c| c.matches(&needle)).collect()
    }

    // ---- edits ----

    /// Set a field value after checking it against the field's kind.
    pub fn edit(&mut self, category_id: &str, item_id: &str, value: SettingValue) -> Result<()> {
        let item = self
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| AppError::not_found(format!("setting category '{category_id}'")))?
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| AppError::not_found(format!("setting '{category_id}.{item_id}'")))?;

        item.check(&value)?;
        if item.value == value {
            return Ok(());
        }

        item.value = value;
        self.dirty.insert((category_id.to_string(), item_id.to_string()));
        Ok(())
    }

    /// Gates the save/cancel bar.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_dirty(&self, category_id: &str, item_id: &str) -> bool {
        self.dirty.contains(&(category_id.to_string(), item_id.to_string()))
    }

    /// Number of edited fields.
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Drop the unsaved flag. Edited values stay as they are.
    pub fn cancel(&mut self) {
        self.dirty.clear();
    }

    // ---- scope ----

    pub fn scope(&self) -> &BranchScope {
        &self.scope
    }

    pub fn select_scope(&mut self, scope: BranchScope) {
        self.scope = scope;
    }

    /// Human label for the current scope.
    pub fn scope_label(&self) -> String {
        match &self.scope {
            BranchScope::All => "All Branches".to_string(),
            BranchScope::Branch(id) => self
                .branches()
                .iter()
                .find(|b| &b.id == id)
                .map(|b| format!("{} ({})", b.name, b.location))
                .unwrap_or_else(|| format!("Branch {id}")),
        }
    }

    pub fn begin_branch_load(&mut self) -> RequestToken {
        self.branches.begin()
    }

    pub fn track_branches(&mut self, handle: tokio::task::AbortHandle) {
        self.branches.track(handle);
    }

    pub fn apply_branches(&mut self, token: RequestToken, result: Result<Vec<Branch>>) -> bool {
        let outcome = result.map_err(|e| {
            tracing::warn!("Failed to load branches: {e}");
            "Branches unavailable".to_string()
        });
        self.branches.complete(token, outcome)
    }

    /// Loaded branches, empty otherwise.
    pub fn branches(&self) -> &[Branch] {
        self.branches.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn branches_error(&self) -> Option<&str> {
        self.branches.error()
    }

    // ---- save ----

    /// Collect edited fields for the current scope and mark a save in flight.
    /// `None` when nothing is dirty or a save is already running.
    pub fn prepare_save(&mut self) -> Option<SettingsUpdate> {
        if self.saving.is_some() || self.dirty.is_empty() {
            return None;
        }

        let changes: Vec<SettingChange> = self
            .dirty
            .iter()
            .filter_map(|(category_id, item_id)| {
                let item = self.category(category_id)?.item(item_id)?;
                Some(SettingChange {
                    category_id: category_id.clone(),
                    item_id: item_id.clone(),
                    value: item.value.clone(),
                })
            })
            .collect();

        self.saving = Some(changes.clone());
        Some(SettingsUpdate {
            branch: self.scope.query_value().to_string(),
            changes,
        })
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    /// Clear the flags of fields still holding the value that was sent and
    /// show the confirmation banner. Fields edited during the save stay dirty.
    pub fn save_succeeded(&mut self, now: Instant) {
        for change in self.saving.take().unwrap_or_default() {
            let unchanged = self
                .category(&change.category_id)
                .and_then(|c| c.item(&change.item_id))
                .is_some_and(|item| item.value == change.value);
            if unchanged {
                self.dirty.remove(&(change.category_id, change.item_id));
            }
        }
        self.banner = Some(Banner {
            kind: BannerKind::Success,
            message: SAVED_MESSAGE.to_string(),
            shown_at: now,
        });
    }

    /// Keep the edits and show why saving failed.
    pub fn save_failed(&mut self, message: impl Into<String>, now: Instant) {
        self.saving = None;
        self.banner = Some(Banner {
            kind: BannerKind::Error,
            message: message.into(),
            shown_at: now,
        });
    }

    // ---- banner ----

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Time left before the banner disappears.
    pub fn banner_remaining(&self, now: Instant) -> Option<Duration> {
        self.banner
            .as_ref()
            .map(|b| self.banner_duration.saturating_sub(now.saturating_duration_since(b.shown_at)))
    }

    /// Remove the banner once its display time is over.
    pub fn expire_banner(&mut self, now: Instant) {
        if self.banner_remaining(now).is_some_and(|left| left.is_zero()) {
            self.banner = None;
        }
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::default_categories;

    fn editor() -> SettingsEditorView {
        SettingsEditorView::new(default_categories(), Duration::from_secs(3))
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut view = editor();
        view.toggle("billing");
        assert!(view.is_expanded("billing"));

        view.toggle("appointments");
        view.toggle("billing");
        assert!(!view.is_expanded("billing"));
        assert!(view.is_expanded("appointments"));
    }

    #[test]
    fn test_multiple_expanded() {
        let mut view = editor();
        view.toggle("general");
        view.toggle("security");
        assert!(view.is_expanded("general"));
        assert!(view.is_expanded("security"));
        assert!(!view.is_expanded("billing"));
    }

    #[test]
    fn test_search_matches_label_only() {
        let mut view = editor();
        // "Cashless Admission" is an item label, not in any title/description.
        view.set_search("CASHLESS");
        let ids: Vec<_> = view.visible_categories().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids, vec!["insurance".to_string()]);
    }

    #[test]
    fn test_search_matches_title_and_description() {
        let mut view = editor();
        view.set_search("  billing ");
        assert_eq!(view.visible_categories()[0].id, "billing");

        view.set_search("two-factor");
        assert_eq!(view.visible_categories()[0].id, "security");
    }

    #[test]
    fn test_blank_search_shows_all() {
        let mut view = editor();
        view.set_search("   ");
        assert_eq!(view.visible_categories().len(), view.categories().len());
    }

    #[test]
    fn test_search_does_not_touch_expansion() {
        let mut view = editor();
        view.toggle("notifications");
        view.set_search("currency");
        assert!(view.is_expanded("notifications"));
        view.set_search("");
        assert!(view.is_expanded("notifications"));
    }

    #[test]
    fn test_edit_sets_unsaved_and_cancel_clears() {
        let mut view = editor();
        assert!(!view.has_unsaved_changes());

        view.edit("general", "hospital_name", SettingValue::Text("Sunrise Hospital".to_string()))
            .unwrap();
        assert!(view.has_unsaved_changes());
        assert!(view.is_dirty("general", "hospital_name"));

        view.cancel();
        assert!(!view.has_unsaved_changes());
        // Values are not reverted on cancel.
        let item = view.categories()[0].item("hospital_name").unwrap();
        assert_eq!(item.value, SettingValue::Text("Sunrise Hospital".to_string()));
    }

    #[test]
    fn test_every_kind_marks_dirty() {
        let edits = [
            ("general", "maintenance_mode", SettingValue::Bool(true)),
            ("appointments", "slot_duration", SettingValue::Number(20.0)),
            ("billing", "currency", SettingValue::Text("USD".to_string())),
            ("billing", "invoice_footer", SettingValue::Text("Get well soon".to_string())),
        ];

        for (category, item, value) in edits {
            let mut view = editor();
            view.edit(category, item, value).unwrap();
            assert!(view.has_unsaved_changes(), "{category}.{item}");
        }
    }

    #[test]
    fn test_invalid_edit_rejected() {
        let mut view = editor();
        let err = view
            .edit("billing", "currency", SettingValue::Text("BTC".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!view.has_unsaved_changes());

        let err = view
            .edit("billing", "tax_rate", SettingValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unknown_field_not_found() {
        let mut view = editor();
        assert!(matches!(
            view.edit("pharmacy", "x", SettingValue::Bool(true)),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            view.edit("billing", "x", SettingValue::Bool(true)),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_same_value_is_not_dirty() {
        let mut view = editor();
        view.edit("billing", "currency", SettingValue::Text("INR".to_string()))
            .unwrap();
        assert!(!view.has_unsaved_changes());
    }

    #[test]
    fn test_prepare_save_collects_dirty_fields_for_scope() {
        let mut view = editor();
        view.select_scope(BranchScope::Branch("2".to_string()));
        view.edit("billing", "tax_rate", SettingValue::Number(12.0)).unwrap();
        view.edit("general", "maintenance_mode", SettingValue::Bool(true))
            .unwrap();

        let update = view.prepare_save().unwrap();
        assert_eq!(update.branch, "2");
        assert_eq!(update.changes.len(), 2);
        assert!(view.is_saving());

        // A second click while saving does nothing.
        assert!(view.prepare_save().is_none());
    }

    #[test]
    fn test_edit_during_save_stays_dirty() {
        let mut view = editor();
        view.edit("billing", "tax_rate", SettingValue::Number(12.0)).unwrap();
        let update = view.prepare_save().unwrap();
        assert_eq!(update.changes.len(), 1);

        // Edited while the request is in flight: not part of `update`.
        view.edit("general", "maintenance_mode", SettingValue::Bool(true))
            .unwrap();

        view.save_succeeded(Instant::now());
        assert!(!view.is_dirty("billing", "tax_rate"));
        assert!(view.is_dirty("general", "maintenance_mode"));
        assert!(view.has_unsaved_changes());

        let next = view.prepare_save().unwrap();
        assert_eq!(next.changes.len(), 1);
        assert_eq!(next.changes[0].item_id, "maintenance_mode");
    }

    #[test]
    fn test_field_reedited_during_save_stays_dirty() {
        let mut view = editor();
        view.edit("billing", "tax_rate", SettingValue::Number(12.0)).unwrap();
        view.prepare_save().unwrap();

        view.edit("billing", "tax_rate", SettingValue::Number(15.0)).unwrap();
        view.save_succeeded(Instant::now());

        assert!(view.is_dirty("billing", "tax_rate"));
    }

    #[test]
    fn test_stale_catalog_keeps_edits() {
        let mut view = SettingsEditorView::new(Vec::new(), Duration::from_secs(3));
        let first = view.begin_catalog_load();
        let second = view.begin_catalog_load();

        assert!(view.apply_categories(second, Ok(default_categories())));
        view.edit("billing", "tax_rate", SettingValue::Number(7.0)).unwrap();

        assert!(!view.apply_categories(first, Ok(default_categories())));
        assert!(view.is_dirty("billing", "tax_rate"));
        assert!(!view.is_catalog_loading());
    }

    #[test]
    fn test_catalog_failure_reported() {
        let mut view = SettingsEditorView::new(Vec::new(), Duration::from_secs(3));
        let token = view.begin_catalog_load();
        assert!(view.apply_categories(token, Err(AppError::parse("bad catalog"))));
        assert!(view.catalog_error().is_some());
        assert!(view.categories().is_empty());
    }

    #[test]
    fn test_prepare_save_without_changes() {
        let mut view = editor();
        assert!(view.prepare_save().is_none());
        assert!(!view.is_saving());
    }

    #[test]
    fn test_save_success_banner_expires() {
        let mut view = editor();
        view.edit("billing", "tax_rate", SettingValue::Number(5.0)).unwrap();
        view.prepare_save().unwrap();

        let now = Instant::now();
        view.save_succeeded(now);
        assert!(!view.has_unsaved_changes());
        assert!(!view.is_saving());
        assert_eq!(view.banner().unwrap().message, SAVED_MESSAGE);

        view.expire_banner(now + Duration::from_secs(1));
        assert!(view.banner().is_some());

        view.expire_banner(now + Duration::from_secs(3));
        assert!(view.banner().is_none());
    }

    #[test]
    fn test_save_failure_keeps_edits() {
        let mut view = editor();
        view.edit("billing", "tax_rate", SettingValue::Number(5.0)).unwrap();
        view.prepare_save().unwrap();

        view.save_failed("Request to /settings failed with status 500", Instant::now());
        assert!(view.has_unsaved_changes());
        assert_eq!(view.banner().unwrap().kind, BannerKind::Error);
        assert!(view.prepare_save().is_some());
    }

    #[test]
    fn test_branches_and_scope_label() {
        let mut view = editor();
        assert_eq!(view.scope_label(), "All Branches");

        let token = view.begin_branch_load();
        view.apply_branches(token, Ok(crate::settings::default_branches()));
        view.select_scope(BranchScope::Branch("2".to_string()));
        assert_eq!(view.scope_label(), "North Clinic (Nashik)");

        view.select_scope(BranchScope::Branch("99".to_string()));
        assert_eq!(view.scope_label(), "Branch 99");
    }

    #[test]
    fn test_branch_load_failure() {
        let mut view = editor();
        let token = view.begin_branch_load();
        view.apply_branches(token, Err(AppError::parse("bad")));
        assert!(view.branches().is_empty());
        assert!(view.branches_error().is_some());
    }
}
