//! Magic Resolver
//!
//! The name-resolution capability used by the address input, plus the
//! collaborators that commonly sit behind it.
//!
//! This crate provides:
//! - [`resolver`]: the [`NameResolver`] trait and [`ResolveOptions`]
//! - [`cache`]: [`CachingResolver`], a TTL cache in front of any resolver
//! - [`directory`]: [`StaticResolver`], an in-memory, JSON-loadable name table
//! - `scripted` (feature `test-utils`): a resolver whose answers tests control
//!
//! # Result convention
//!
//! Every lookup returns `anyhow::Result<Option<T>>`: `Ok(Some)` is a hit,
//! `Ok(None)` a definite miss, `Err` a transport failure. Callers that need to
//! tell "no such name" apart from "could not ask" rely on that split.

pub mod cache;
pub mod directory;
pub mod resolver;
#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

pub use cache::CachingResolver;
pub use directory::{NameRecord, StaticResolver};
pub use resolver::{
    LookupKind, NameResolver, ResolveOptions, DEFAULT_CACHE_TTL_MS, DEFAULT_CHAIN_ID,
};
#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedResolver;
