//! The name-resolution capability consumed by the input widget.
//!
//! The widget never talks to a naming service directly. It is handed something
//! implementing [`NameResolver`] and issues three kinds of queries through it:
//! forward (alias to address), reverse (address to alias) and avatar (alias to
//! image reference). All three follow the same result convention:
//!
//! - `Ok(Some(_))`: definite hit
//! - `Ok(None)`: definite miss (no such alias, no reverse record, no avatar)
//! - `Err(_)`: transport failure; the caller decides how to present it
//!
//! Queries are idempotent and keyed by their input, so implementations are free
//! to cache them (see [`CachingResolver`](crate::cache::CachingResolver)).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use magic_address_types::Address;
use serde::{Deserialize, Serialize};

/// Default network selector (Ethereum mainnet).
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Default lifetime of a cached lookup result.
pub const DEFAULT_CACHE_TTL_MS: u64 = 30_000;

/// Per-query options passed through to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Network/namespace the lookup is performed against.
    pub chain_id: u64,
    /// How long a definite result may be served from cache.
    pub cache_ttl_ms: u64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
        }
    }
}

impl ResolveOptions {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

/// Which of the three queries a lookup is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Forward,
    Reverse,
    Avatar,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKind::Forward => write!(f, "forward"),
            LookupKind::Reverse => write!(f, "reverse"),
            LookupKind::Avatar => write!(f, "avatar"),
        }
    }
}

/// Forward/reverse/avatar lookups against a naming service.
#[async_trait::async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve an alias to the address it points at.
    async fn resolve_name(&self, name: &str, options: &ResolveOptions) -> Result<Option<Address>>;

    /// Find the primary alias registered for an address.
    async fn lookup_address(
        &self,
        address: &Address,
        options: &ResolveOptions,
    ) -> Result<Option<String>>;

    /// Fetch the avatar image reference (usually a URL) for an alias.
    async fn resolve_avatar(&self, name: &str, options: &ResolveOptions)
        -> Result<Option<String>>;
}

#[async_trait::async_trait]
impl<R: NameResolver + ?Sized> NameResolver for Arc<R> {
    async fn resolve_name(&self, name: &str, options: &ResolveOptions) -> Result<Option<Address>> {
        (**self).resolve_name(name, options).await
    }

    async fn lookup_address(
        &self,
        address: &Address,
        options: &ResolveOptions,
    ) -> Result<Option<String>> {
        (**self).lookup_address(address, options).await
    }

    async fn resolve_avatar(
        &self,
        name: &str,
        options: &ResolveOptions,
    ) -> Result<Option<String>> {
        (**self).resolve_avatar(name, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = ResolveOptions::default();
        assert_eq!(options.chain_id, 1);
        assert_eq!(options.cache_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_options_partial_json() {
        let options: ResolveOptions = serde_json::from_str(r#"{"chain_id": 11155111}"#).unwrap();
        assert_eq!(options.chain_id, 11155111);
        assert_eq!(options.cache_ttl_ms, DEFAULT_CACHE_TTL_MS);
    }
}
