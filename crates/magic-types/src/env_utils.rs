//! Environment variable parsing utilities.
//!
//! Type-safe helpers for reading configuration overrides from the environment
//! with default values, replacing the repeated
//! `std::env::var(..).ok().and_then(|v| v.parse().ok()).unwrap_or(..)` pattern.
//!
//! # Example
//!
//! ```
//! use magic_address_types::env_utils::{env_bool_or, env_var, env_var_or};
//!
//! let debounce_ms: u64 = env_var_or("MAGIC_ADDRESS_DEBOUNCE_MS", 500);
//! let chain_id: Option<u64> = env_var("MAGIC_ADDRESS_CHAIN_ID");
//! let hide = env_bool_or("MAGIC_ADDRESS_HIDE_ADDRESS_TEXT", false);
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
///
/// Returns the default if the variable is not set or cannot be parsed.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Check if an environment variable is set to a truthy value, with a default.
///
/// "1", "true", "yes" and "on" (case-insensitive) are truthy; any other set
/// value is false. An unset variable yields `default`.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

/// Parse a comma-separated environment variable into a vector.
///
/// Returns `None` if the variable is not set; empty items are dropped.
pub fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("MAGIC_TEST_U64", " 42 ");
        let val: Option<u64> = env_var("MAGIC_TEST_U64");
        assert_eq!(val, Some(42));

        let missing: Option<u64> = env_var("MAGIC_NONEXISTENT_VAR_12345");
        assert_eq!(missing, None);

        std::env::remove_var("MAGIC_TEST_U64");
    }

    #[test]
    fn test_env_var_or_falls_back_on_garbage() {
        std::env::set_var("MAGIC_TEST_GARBAGE", "not-a-number");
        let val: u64 = env_var_or("MAGIC_TEST_GARBAGE", 50);
        assert_eq!(val, 50);
        std::env::remove_var("MAGIC_TEST_GARBAGE");
    }

    #[test]
    fn test_env_bool_or() {
        std::env::set_var("MAGIC_TEST_BOOL_YES", "YES");
        std::env::set_var("MAGIC_TEST_BOOL_OFF", "off");

        assert!(env_bool_or("MAGIC_TEST_BOOL_YES", false));
        assert!(!env_bool_or("MAGIC_TEST_BOOL_OFF", true));
        assert!(env_bool_or("MAGIC_NONEXISTENT_VAR_12347", true));

        std::env::remove_var("MAGIC_TEST_BOOL_YES");
        std::env::remove_var("MAGIC_TEST_BOOL_OFF");
    }

    #[test]
    fn test_env_list() {
        std::env::set_var("MAGIC_TEST_LIST", ".eth, .xyz,,");
        assert_eq!(
            env_list("MAGIC_TEST_LIST"),
            Some(vec![".eth".to_string(), ".xyz".to_string()])
        );
        assert_eq!(env_list("MAGIC_NONEXISTENT_VAR_12349"), None);
        std::env::remove_var("MAGIC_TEST_LIST");
    }
}
