//! Settings catalog types: categories, items, values, branches and updates.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::appointment::{null_as_default, string_or_number};
use crate::error::{AppError, Result};

/// Editor widget / value type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Text,
    Select,
    Toggle,
    Number,
    Textarea,
    Date,
    Time,
}

/// Current value of a setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    #[serde(serialize_with = "serialize_time")]
    Time(NaiveTime),
}

fn serialize_time<S: serde::Serializer>(time: &NaiveTime, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format("%H:%M").to_string())
}

impl SettingValue {
    /// Short display form, used in logs and search.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => (if *b { "On" } else { "Off" }).to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Time(t) => t.format("%H:%M").to_string(),
        }
    }
}

/// A single editable setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingItem {
    pub id: String,
    pub label: String,
    pub kind: SettingKind,
    pub value: SettingValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl SettingItem {
    fn new(id: &str, label: &str, kind: SettingKind, value: SettingValue) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            value,
            options: None,
            help: None,
        }
    }

    pub fn text(id: &str, label: &str, value: &str) -> Self {
        Self::new(id, label, SettingKind::Text, SettingValue::Text(value.to_string()))
    }

    pub fn textarea(id: &str, label: &str, value: &str) -> Self {
        Self::new(id, label, SettingKind::Textarea, SettingValue::Text(value.to_string()))
    }

    pub fn select(id: &str, label: &str, value: &str, options: &[&str]) -> Self {
        let mut item = Self::new(id, label, SettingKind::Select, SettingValue::Text(value.to_string()));
        item.options = Some(options.iter().map(|o| o.to_string()).collect());
        item
    }

    pub fn toggle(id: &str, label: &str, value: bool) -> Self {
        Self::new(id, label, SettingKind::Toggle, SettingValue::Bool(value))
    }

    pub fn number(id: &str, label: &str, value: f64) -> Self {
        Self::new(id, label, SettingKind::Number, SettingValue::Number(value))
    }

    pub fn date(id: &str, label: &str, value: NaiveDate) -> Self {
        Self::new(id, label, SettingKind::Date, SettingValue::Date(value))
    }

    pub fn time(id: &str, label: &str, value: NaiveTime) -> Self {
        Self::new(id, label, SettingKind::Time, SettingValue::Time(value))
    }

    /// Attach help text shown under the field.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Check that `value` is acceptable for this item's kind.
    pub fn check(&self, value: &SettingValue) -> Result<()> {
        let ok = match (self.kind, value) {
            (SettingKind::Text | SettingKind::Textarea, SettingValue::Text(_)) => true,
            (SettingKind::Select, SettingValue::Text(v)) => {
                return match &self.options {
                    Some(options) if options.iter().any(|o| o == v) => Ok(()),
                    _ => Err(AppError::validation(format!(
                        "'{v}' is not an allowed option for {}",
                        self.label
                    ))),
                };
            }
            (SettingKind::Toggle, SettingValue::Bool(_)) => true,
            (SettingKind::Number, SettingValue::Number(n)) => n.is_finite(),
            (SettingKind::Date, SettingValue::Date(_)) => true,
            (SettingKind::Time, SettingValue::Time(_)) => true,
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "{:?} value does not fit {} ({:?})",
                value, self.label, self.kind
            )))
        }
    }

    /// Whether the stored value satisfies the kind invariant.
    pub fn is_consistent(&self) -> bool {
        self.check(&self.value).is_ok()
    }
}

/// A group of related settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Phosphor icon glyph.
    pub icon: String,
    /// Accent color as RGB.
    pub accent: [u8; 3],
    pub items: Vec<SettingItem>,
}

impl SettingCategory {
    /// Case-insensitive match on title, description or any item label.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.items.iter().any(|i| i.label.to_lowercase().contains(needle))
    }

    pub fn item(&self, item_id: &str) -> Option<&SettingItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}

/// Physical hospital location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
}

/// Body of `GET /super-admin/branches`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchList {
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// Which branches a settings change applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BranchScope {
    #[default]
    All,
    Branch(String),
}

impl BranchScope {
    /// Value for the `branch` query parameter.
    pub fn query_value(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Branch(id) => id,
        }
    }
}

/// One changed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingChange {
    pub category_id: String,
    pub item_id: String,
    pub value: SettingValue,
}

/// Body of `PUT /settings?branch=...`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsUpdate {
    pub branch: String,
    pub changes: Vec<SettingChange>,
}
