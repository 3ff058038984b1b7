//! In-memory name directory.
//!
//! [`StaticResolver`] answers lookups from a fixed table of records, optionally
//! after a simulated network delay. It backs the demo binary and offline setups
//! where a real naming service is not reachable.
//!
//! The JSON form is a list of records:
//!
//! ```json
//! [
//!   { "name": "vitalik.eth", "address": "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
//!     "avatar": "https://example.invalid/vitalik.png" }
//! ]
//! ```
//!
//! The first record for an address is its reverse (primary) name.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use magic_address_types::{normalize_alias, Address};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::resolver::{NameResolver, ResolveOptions};

/// One directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Resolver backed by an in-memory table.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    by_name: HashMap<String, NameRecord>,
    primary_names: HashMap<Address, String>,
    latency: Option<Duration>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from records. Later records with the same name win;
    /// the first record seen for an address becomes its reverse name.
    pub fn from_records(records: impl IntoIterator<Item = NameRecord>) -> Self {
        let mut resolver = Self::new();
        for record in records {
            resolver.insert(record);
        }
        resolver
    }

    /// Load records from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read name directory {}", path.display()))?;
        let records: Vec<NameRecord> = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse name directory {}", path.display()))?;
        debug!(path = %path.display(), records = records.len(), "loaded name directory");
        Ok(Self::from_records(records))
    }

    /// Delay every answer by `latency`, mimicking a remote service.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert(&mut self, record: NameRecord) {
        let key = normalize_alias(&record.name);
        self.primary_names
            .entry(record.address)
            .or_insert_with(|| record.name.clone());
        self.by_name.insert(key, record);
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait::async_trait]
impl NameResolver for StaticResolver {
    async fn resolve_name(&self, name: &str, _options: &ResolveOptions) -> Result<Option<Address>> {
        self.simulate_latency().await;
        Ok(self
            .by_name
            .get(&normalize_alias(name))
            .map(|record| record.address))
    }

    async fn lookup_address(
        &self,
        address: &Address,
        _options: &ResolveOptions,
    ) -> Result<Option<String>> {
        self.simulate_latency().await;
        Ok(self.primary_names.get(address).cloned())
    }

    async fn resolve_avatar(
        &self,
        name: &str,
        _options: &ResolveOptions,
    ) -> Result<Option<String>> {
        self.simulate_latency().await;
        Ok(self
            .by_name
            .get(&normalize_alias(name))
            .and_then(|record| record.avatar.clone()))
    }
}
