//! Widget configuration.
//!
//! Defaults match a mainnet address field: 500 ms debounce, chain 1, results
//! cached for 30 s, `.eth`/`.xyz` aliases. Overrides come from a JSON file, the
//! environment, or both (environment last).
//!
//! Environment variables:
//!
//! - `MAGIC_ADDRESS_DEBOUNCE_MS`
//! - `MAGIC_ADDRESS_CHAIN_ID`
//! - `MAGIC_ADDRESS_CACHE_TTL_MS`
//! - `MAGIC_ADDRESS_ALIAS_SUFFIXES` (comma separated)
//! - `MAGIC_ADDRESS_HIDE_ADDRESS_TEXT`

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use magic_address_types::env_utils::{env_bool_or, env_list, env_var_or};
use magic_address_types::{AliasRules, DEFAULT_ALIAS_SUFFIXES};
use magic_resolver::ResolveOptions;
use serde::{Deserialize, Serialize};

/// Default debounce window for typed input.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Quiet period before typed text becomes eligible for lookup.
    pub debounce_ms: u64,
    /// Options forwarded to every resolver query.
    pub resolve: ResolveOptions,
    /// Suffixes that mark input as an alias.
    pub alias_suffixes: Vec<String>,
    /// Omit the abbreviated address from suggestion rows.
    pub hide_address_text: bool,
    /// Host-level disable, OR-ed with the pending-lookup flag.
    pub disabled: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            resolve: ResolveOptions::default(),
            alias_suffixes: DEFAULT_ALIAS_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            hide_address_text: false,
            disabled: false,
        }
    }
}

impl InputConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.debounce_ms = env_var_or("MAGIC_ADDRESS_DEBOUNCE_MS", self.debounce_ms);
        self.resolve.chain_id = env_var_or("MAGIC_ADDRESS_CHAIN_ID", self.resolve.chain_id);
        self.resolve.cache_ttl_ms =
            env_var_or("MAGIC_ADDRESS_CACHE_TTL_MS", self.resolve.cache_ttl_ms);
        if let Some(suffixes) = env_list("MAGIC_ADDRESS_ALIAS_SUFFIXES") {
            self.alias_suffixes = suffixes;
        }
        self.hide_address_text =
            env_bool_or("MAGIC_ADDRESS_HIDE_ADDRESS_TEXT", self.hide_address_text);
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn alias_rules(&self) -> AliasRules {
        AliasRules::new(self.alias_suffixes.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InputConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.resolve.chain_id, 1);
        assert!(config.alias_rules().is_alias("vitalik.eth"));
        assert!(!config.hide_address_text);
    }

    #[test]
    fn test_partial_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"debounce_ms": 200, "resolve": {"chain_id": 10}, "alias_suffixes": ["op"]}"#,
        )
        .unwrap();

        let config = InputConfig::from_json_file(&path).unwrap();
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(config.resolve.chain_id, 10);
        assert_eq!(config.resolve.cache_ttl_ms, 30_000);
        assert!(config.alias_rules().is_alias("alice.op"));
        assert!(!config.alias_rules().is_alias("alice.eth"));
    }

    #[test]
    fn test_json_keys_match_env_names() {
        let value = serde_json::to_value(InputConfig::default()).unwrap();
        assert_eq!(value["debounce_ms"], 500);
        assert_eq!(value["resolve"]["cache_ttl_ms"], 30_000);
        assert_eq!(value["resolve"]["chain_id"], 1);
        assert!(value.get("debounce").is_none());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(InputConfig::from_json_file(dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("MAGIC_ADDRESS_DEBOUNCE_MS", "120");
        std::env::set_var("MAGIC_ADDRESS_ALIAS_SUFFIXES", "sui, base");
        let config = InputConfig::from_env();
        std::env::remove_var("MAGIC_ADDRESS_DEBOUNCE_MS");
        std::env::remove_var("MAGIC_ADDRESS_ALIAS_SUFFIXES");

        assert_eq!(config.debounce_ms, 120);
        assert!(config.alias_rules().is_alias("a.sui"));
        assert!(config.alias_rules().is_alias("a.base"));
    }
}
