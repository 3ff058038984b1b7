//! Magic Address
//!
//! Input assistance for a blockchain address field:
//!
//! - **Debounced resolution**: typed aliases (`vitalik.eth`) resolve to
//!   addresses after a quiet period; pasted addresses skip the wait
//! - **Reverse decoration**: a settled address is shown with its primary alias
//!   and avatar
//! - **Address book**: a ranked, deduplicated suggestion list shared by every
//!   field, fed by typing, resolution, the connected wallet and known contracts
//!
//! The core is the synchronous [`coordinator::Coordinator`]. Hosts that run on
//! tokio use [`widget::AddressInput`], which runs lookups through any
//! [`magic_resolver::NameResolver`] and drives the debounce clock.

pub mod address_book;
pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod outside;
pub mod session;
pub mod sources;
pub mod view;
pub mod widget;

pub use address_book::{AddressBook, Label, MergeOutcome, Suggestion};
pub use config::InputConfig;
pub use coordinator::{Coordinator, Effect, LookupState};
pub use error::ResolutionError;
pub use sources::{ingest_known, load_known_identifiers, spawn_primary_sync, PrimarySync};
pub use view::{AvatarView, InputView, Prefix, SuggestionView};
pub use widget::AddressInput;
