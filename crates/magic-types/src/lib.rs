//! Shared types for the magic-address workspace.
//!
//! This crate provides the foundational vocabulary used by both the resolver
//! capability and the input widget:
//!
//! - [`address`]: the canonical [`Address`] type with parsing and display helpers
//! - [`alias`]: suffix-based alias detection
//! - [`env_utils`]: environment-variable configuration helpers

pub mod address;
pub mod alias;
pub mod env_utils;

pub use address::{
    is_address, parse_address, shorten_address, Address, AddressParseError,
    ADDRESS_HEX_LENGTH, ADDRESS_LENGTH,
};
pub use alias::{normalize_alias, AliasRules, DEFAULT_ALIAS_SUFFIXES};
