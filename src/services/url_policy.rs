//! Which tab URLs can be saved.
//!
//! Browser-internal pages cannot be reopened by an extension, so tabs showing
//! them are left out of snapshots and counts.

use crate::types::preferences::{Preferences, DEFAULT_RESTRICTED_SCHEMES};

/// Restricted-scheme predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlPolicy {
    restricted_prefixes: Vec<String>,
}

impl UrlPolicy {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            restricted_prefixes: prefixes
                .into_iter()
                .map(|p| p.into().to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self::new(preferences.restricted_schemes.iter().cloned())
    }

    /// Scheme matching is case-insensitive.
    pub fn is_restricted(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        self.restricted_prefixes.iter().any(|p| lower.starts_with(p.as_str()))
    }
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RESTRICTED_SCHEMES)
    }
}
