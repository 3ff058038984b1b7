//! Feeds that populate the address book from outside the field.
//!
//! - [`spawn_primary_sync`]: follows the connected identity and moves the
//!   primary slot whenever it changes.
//! - [`load_known_identifiers`] / [`ingest_known`]: named addresses from a
//!   JSON manifest, such as the contracts a project has deployed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use magic_address_types::{parse_address, Address};
use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::address_book::{AddressBook, Label, MergeOutcome};

/// Handle to the connected-identity task. Dropping it stops the task.
#[derive(Debug)]
pub struct PrimarySync {
    handle: Option<JoinHandle<()>>,
}

impl PrimarySync {
    /// Stop the task now.
    pub fn abort(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Let the task run until the sender is dropped.
    pub fn detach(mut self) -> Option<JoinHandle<()>> {
        self.handle.take()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for PrimarySync {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Keep `book`'s primary slot in step with `connected`.
///
/// The current value is applied right away, then every change after it.
/// `None` (disconnected) leaves the book as it is. Malformed values are
/// ignored with a debug log. Must be called inside a tokio runtime.
pub fn spawn_primary_sync(
    book: Arc<AddressBook>,
    mut connected: watch::Receiver<Option<String>>,
) -> PrimarySync {
    let handle = tokio::spawn(async move {
        loop {
            let current = connected.borrow_and_update().clone();
            if let Some(identifier) = current {
                if book.set_primary_str(&identifier) {
                    info!(identifier = %identifier, "connected identity changed");
                }
            }
            if connected.changed().await.is_err() {
                debug!("connected identity feed closed");
                break;
            }
        }
    });
    PrimarySync {
        handle: Some(handle),
    }
}

/// One manifest value: a bare address or a record carrying one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KnownEntry {
    Address(String),
    Contract { address: String },
}

impl KnownEntry {
    fn address(&self) -> &str {
        match self {
            KnownEntry::Address(address) | KnownEntry::Contract { address } => address,
        }
    }
}

/// Read a `{ name: address | { "address": ... } }` manifest.
///
/// Entries whose address does not parse are skipped with a debug log.
pub fn load_known_identifiers(path: impl AsRef<Path>) -> Result<Vec<(String, Address)>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read known identifiers {}", path.display()))?;
    let raw: BTreeMap<String, KnownEntry> = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse known identifiers {}", path.display()))?;

    let mut known = Vec::with_capacity(raw.len());
    for (name, entry) in raw {
        match parse_address(entry.address()) {
            Some(address) => known.push((name, address)),
            None => debug!(name = %name, value = entry.address(), "skipping malformed known identifier"),
        }
    }
    debug!(path = %path.display(), count = known.len(), "loaded known identifiers");
    Ok(known)
}

/// Merge named addresses into `book` as custom labels without timestamps.
///
/// Returns how many entries were inserted or relabelled. Running it twice with
/// the same input changes nothing the second time.
pub fn ingest_known(
    book: &AddressBook,
    entries: impl IntoIterator<Item = (String, Address)>,
) -> usize {
    book.merge_many(
        entries
            .into_iter()
            .map(|(name, address)| (address, Label::custom(name), None)),
    )
    .into_iter()
    .filter(|outcome| *outcome != MergeOutcome::Unchanged)
    .count()
}
