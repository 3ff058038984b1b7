//! Per-keystroke session derivation.
//!
//! A [`Session`] is recomputed from `(raw, debounced)` every time either side
//! changes. It is a pure projection: two calls with the same inputs always
//! agree on liveness and on which lookup the settled value is eligible for.

use magic_address_types::{Address, AliasRules};

/// Snapshot of the input relative to its debounced value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session<'a> {
    pub raw: &'a str,
    pub debounced: &'a str,
    /// No newer keystroke has invalidated the debounced value.
    pub is_live: bool,
}

impl<'a> Session<'a> {
    pub fn derive(raw: &'a str, debounced: &'a str) -> Self {
        Self {
            raw,
            debounced,
            is_live: raw == debounced,
        }
    }

    /// The value eligible for lookup: the debounced value while live.
    pub fn settled(&self) -> Option<&'a str> {
        self.is_live.then_some(self.debounced)
    }
}

/// What a settled value is eligible for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettledKind {
    /// Canonical address: reverse lookup.
    Address(Address),
    /// Alias-shaped text: forward lookup.
    Alias,
    /// Anything else: no lookup.
    Other,
}

impl SettledKind {
    pub fn classify(settled: &str, rules: &AliasRules) -> Self {
        if let Ok(address) = settled.parse::<Address>() {
            SettledKind::Address(address)
        } else if rules.is_alias(settled) {
            SettledKind::Alias
        } else {
            SettledKind::Other
        }
    }
}
