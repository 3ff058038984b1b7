//! Alias syntax detection.
//!
//! An alias is a human-readable name that a naming service can map to an
//! [`Address`](crate::Address), e.g. `vitalik.eth`. Whether an input *looks* like
//! an alias is decided purely by suffix; whether it actually resolves is the
//! resolver's job.

use serde::{Deserialize, Serialize};

/// Suffixes recognised as alias namespaces when no configuration is supplied.
pub const DEFAULT_ALIAS_SUFFIXES: [&str; 2] = [".eth", ".xyz"];

/// Suffix-based alias recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRules {
    suffixes: Vec<String>,
}

impl Default for AliasRules {
    fn default() -> Self {
        Self::new(DEFAULT_ALIAS_SUFFIXES.iter().map(|s| s.to_string()))
    }
}

impl AliasRules {
    /// Build rules from suffixes. A missing leading dot is added, and
    /// suffixes are matched case-insensitively.
    pub fn new(suffixes: impl IntoIterator<Item = String>) -> Self {
        let suffixes = suffixes
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty() && s != ".")
            .map(|s| if s.starts_with('.') { s } else { format!(".{}", s) })
            .collect();
        Self { suffixes }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// True when `value` ends with a known suffix and has a non-empty name before it.
    ///
    /// # Examples
    ///
    /// ```
    /// use magic_address_types::alias::AliasRules;
    ///
    /// let rules = AliasRules::default();
    /// assert!(rules.is_alias("vitalik.eth"));
    /// assert!(rules.is_alias("Nick.XYZ"));
    /// assert!(!rules.is_alias(".eth"));
    /// assert!(!rules.is_alias("vitalik"));
    /// ```
    pub fn is_alias(&self, value: &str) -> bool {
        let lower = value.to_lowercase();
        self.suffixes
            .iter()
            .any(|suffix| lower.len() > suffix.len() && lower.ends_with(suffix.as_str()))
    }
}

/// Normalize an alias for use as a lookup key: trimmed and lowercased.
pub fn normalize_alias(alias: &str) -> String {
    alias.trim().to_lowercase()
}
