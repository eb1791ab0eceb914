//! Object kind registry.
//!
//! Every remote object type Doghouse knows how to sync is a variant of
//! [`ObjectKind`]. All per-kind behaviour (file name, API path, fields the
//! API rejects on update) hangs off [`ObjectKind::info`], so adding a kind is
//! a single table edit.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A registered remote configuration object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Monitor,
    Dashboard,
}

/// Static metadata for an [`ObjectKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// Singular name, e.g. `monitor`.
    pub singular: &'static str,
    /// Plural key used as the local file stem and CLI argument, e.g. `monitors`.
    pub plural_key: &'static str,
    /// Cosmetic marker for console output.
    pub emoji: &'static str,
    /// Fields removed before an object is sent back as an update.
    pub strip_on_push: &'static [&'static str],
    /// Human-readable field printed by `list`.
    pub label_field: &'static str,
    /// Path segment under `/api/v1/`.
    pub api_path: &'static str,
    /// Key wrapping the list response, if the endpoint doesn't return a bare array.
    pub list_envelope: Option<&'static str>,
    /// Whether list entries are summaries that need a per-object detail fetch.
    pub list_is_summary: bool,
}

const MONITOR: KindInfo = KindInfo {
    singular: "monitor",
    plural_key: "monitors",
    emoji: "🚨",
    strip_on_push: &["id"],
    label_field: "name",
    api_path: "monitor",
    list_envelope: None,
    list_is_summary: false,
};

const DASHBOARD: KindInfo = KindInfo {
    singular: "dashboard",
    plural_key: "dashboards",
    emoji: "📊",
    strip_on_push: &["id", "author_name"],
    label_field: "title",
    api_path: "dashboard",
    list_envelope: Some("dashboards"),
    list_is_summary: true,
};

impl ObjectKind {
    /// Every registered kind, in sync order.
    pub const ALL: [Self; 2] = [Self::Monitor, Self::Dashboard];

    /// Registry lookup.
    #[must_use]
    pub const fn info(self) -> &'static KindInfo {
        match self {
            Self::Monitor => &MONITOR,
            Self::Dashboard => &DASHBOARD,
        }
    }

    #[must_use]
    pub const fn plural_key(self) -> &'static str {
        self.info().plural_key
    }

    #[must_use]
    pub const fn singular(self) -> &'static str {
        self.info().singular
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        self.info().emoji
    }

    /// Local file name for this kind, e.g. `dashboards.json`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.plural_key())
    }

    /// Plural keys of every registered kind.
    #[must_use]
    pub fn plural_keys() -> Vec<String> {
        Self::ALL.iter().map(|k| k.plural_key().to_string()).collect()
    }

    /// Resolve a plural key (`monitors`) to its kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKind`] for anything not in the registry.
    pub fn from_plural_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.plural_key() == key)
            .ok_or_else(|| unknown(key))
    }
}

/// Iterate the registered kinds.
pub fn all_kinds() -> impl Iterator<Item = ObjectKind> + Clone {
    ObjectKind::ALL.into_iter()
}

fn unknown(name: &str) -> Error {
    Error::UnknownKind {
        name: name.to_string(),
        valid: ObjectKind::plural_keys(),
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.singular())
    }
}

/// Accepts either the singular or plural name, case-insensitively.
impl std::str::FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.singular() == lowered || k.plural_key() == lowered)
            .ok_or_else(|| unknown(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_plural_keys_are_unique() {
        let keys: HashSet<_> = all_kinds().map(ObjectKind::plural_key).collect();
        assert_eq!(keys.len(), ObjectKind::ALL.len());
    }

    #[test]
    fn test_all_kinds_is_restartable() {
        let kinds = all_kinds();
        let first: Vec<_> = kinds.clone().collect();
        let second: Vec<_> = kinds.collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![ObjectKind::Monitor, ObjectKind::Dashboard]);
    }

    #[test]
    fn test_strip_fields() {
        assert_eq!(ObjectKind::Monitor.info().strip_on_push, &["id"]);
        assert_eq!(
            ObjectKind::Dashboard.info().strip_on_push,
            &["id", "author_name"]
        );
    }

    #[test]
    fn test_from_plural_key() {
        assert_eq!(
            ObjectKind::from_plural_key("dashboards").unwrap(),
            ObjectKind::Dashboard
        );
        assert!(matches!(
            ObjectKind::from_plural_key("dashboard"),
            Err(Error::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_from_str_accepts_singular_and_plural() {
        assert_eq!("monitor".parse::<ObjectKind>().unwrap(), ObjectKind::Monitor);
        assert_eq!("Monitors".parse::<ObjectKind>().unwrap(), ObjectKind::Monitor);

        let err = "slo".parse::<ObjectKind>().unwrap_err();
        match err {
            Error::UnknownKind { name, valid } => {
                assert_eq!(name, "slo");
                assert_eq!(valid, vec!["monitors", "dashboards"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ObjectKind::Monitor.file_name(), "monitors.json");
    }
}
