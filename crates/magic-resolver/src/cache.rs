//! Time-bounded result cache in front of a resolver.
//!
//! Results are keyed by `(query input, chain_id)` per lookup kind. Definite
//! results (hits and misses) are cached for `options.cache_ttl()`; transport
//! errors are never cached so the next query goes back to the inner resolver.
//! Expired entries are dropped whenever a new result is stored.
//!
//! # Example
//!
//! ```ignore
//! use magic_resolver::{CachingResolver, StaticResolver};
//!
//! let resolver = CachingResolver::new(StaticResolver::from_json_file("names.json")?);
//! let addr = resolver.resolve_name("vitalik.eth", &options).await?;
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use anyhow::Result;
use magic_address_types::{normalize_alias, Address};
use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::trace;

use crate::resolver::{LookupKind, NameResolver, ResolveOptions};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Thread-safe map whose entries expire after a caller-supplied TTL.
#[derive(Debug)]
struct TtlMap<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlMap<K, V> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K, ttl: Duration) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.stored_at.elapsed() < ttl => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }
        let mut entries = self.entries.write();
        if entries
            .get(key)
            .is_some_and(|entry| entry.stored_at.elapsed() >= ttl)
        {
            entries.remove(key);
        }
        None
    }

    /// Store `value` and drop every entry older than `ttl`.
    fn insert(&self, key: K, value: V, ttl: Duration) {
        let mut entries = self.entries.write();
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

/// Wraps a resolver and memoizes its definite answers.
#[derive(Debug)]
pub struct CachingResolver<R> {
    inner: R,
    forward: TtlMap<(String, u64), Option<Address>>,
    reverse: TtlMap<(Address, u64), Option<String>>,
    avatar: TtlMap<(String, u64), Option<String>>,
}

impl<R: NameResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            forward: TtlMap::new(),
            reverse: TtlMap::new(),
            avatar: TtlMap::new(),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of cached entries across all lookup kinds.
    ///
    /// Expired entries are dropped on the next store, so this may briefly
    /// count entries that are already past their lifetime.
    pub fn len(&self) -> usize {
        self.forward.len() + self.reverse.len() + self.avatar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all cached data.
    pub fn clear(&self) {
        self.forward.clear();
        self.reverse.clear();
        self.avatar.clear();
    }
}

#[async_trait::async_trait]
impl<R: NameResolver> NameResolver for CachingResolver<R> {
    async fn resolve_name(&self, name: &str, options: &ResolveOptions) -> Result<Option<Address>> {
        let key = (normalize_alias(name), options.chain_id);
        if let Some(hit) = self.forward.get(&key, options.cache_ttl()) {
            trace!(kind = %LookupKind::Forward, name, "cache hit");
            return Ok(hit);
        }
        let value = self.inner.resolve_name(name, options).await?;
        self.forward.insert(key, value, options.cache_ttl());
        Ok(value)
    }

    async fn lookup_address(
        &self,
        address: &Address,
        options: &ResolveOptions,
    ) -> Result<Option<String>> {
        let key = (*address, options.chain_id);
        if let Some(hit) = self.reverse.get(&key, options.cache_ttl()) {
            trace!(kind = %LookupKind::Reverse, %address, "cache hit");
            return Ok(hit);
        }
        let value = self.inner.lookup_address(address, options).await?;
        self.reverse.insert(key, value.clone(), options.cache_ttl());
        Ok(value)
    }

    async fn resolve_avatar(
        &self,
        name: &str,
        options: &ResolveOptions,
    ) -> Result<Option<String>> {
        let key = (normalize_alias(name), options.chain_id);
        if let Some(hit) = self.avatar.get(&key, options.cache_ttl()) {
            trace!(kind = %LookupKind::Avatar, name, "cache hit");
            return Ok(hit);
        }
        let value = self.inner.resolve_avatar(name, options).await?;
        self.avatar.insert(key, value.clone(), options.cache_ttl());
        Ok(value)
    }
}
