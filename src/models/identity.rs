//! Locally cached identity of the signed-in administrator.

use serde::{Deserialize, Serialize};

/// Key under which the identity blob is stored.
pub const USER_KEY: &str = "user";

/// Identity fields used by the dashboard header. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl UserIdentity {
    /// Parse the stored blob, falling back to empty defaults when malformed.
    pub fn from_blob(blob: Option<&str>) -> Self {
        let Some(raw) = blob else {
            return Self::default();
        };

        match serde_json::from_str::<UserIdentity>(raw) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::debug!("Ignoring malformed user blob: {e}");
                Self::default()
            }
        }
    }

    /// First and last name joined; empty when neither is set.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Up to two uppercase initials for the avatar placeholder.
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }

    /// Profile picture URL, if a non-empty one is stored.
    pub fn avatar_url(&self) -> Option<&str> {
        self.profile_picture.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_identity() {
        let identity = UserIdentity::from_blob(Some(
            r#"{"first_name": "Priya", "last_name": "Nair", "profile_picture": "https://cdn/p.png", "role": "super_admin"}"#,
        ));

        assert_eq!(identity.display_name(), "Priya Nair");
        assert_eq!(identity.initials(), "PN");
        assert_eq!(identity.avatar_url(), Some("https://cdn/p.png"));
    }

    #[test]
    fn test_absent_blob() {
        let identity = UserIdentity::from_blob(None);
        assert_eq!(identity, UserIdentity::default());
        assert_eq!(identity.display_name(), "");
        assert_eq!(identity.avatar_url(), None);
    }

    #[test]
    fn test_malformed_blob() {
        assert_eq!(UserIdentity::from_blob(Some("{not json")), UserIdentity::default());
        assert_eq!(UserIdentity::from_blob(Some("[1, 2]")), UserIdentity::default());
    }

    #[test]
    fn test_partial_identity() {
        let identity = UserIdentity::from_blob(Some(r#"{"last_name": "  Okafor "}"#));
        assert_eq!(identity.display_name(), "Okafor");
        assert_eq!(identity.initials(), "O");
    }
}
