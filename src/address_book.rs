//! Ranked, deduplicated address book backing the suggestion list.
//!
//! The book holds at most one [`Suggestion`] per [`Address`]. Because
//! `Address` stores raw bytes, differently-cased spellings of the same address
//! collapse into one entry.
//!
//! # Label priority
//!
//! When an address is merged a second time, the new label only wins if it
//! outranks the stored one:
//!
//! ```text
//! Primary > PreviousPrimary > Custom(_) > no label
//! ```
//!
//! A merge that does not outrank the stored label is a no-op: the label,
//! the timestamp and the position all stay as they were. A merge that wins
//! removes the old entry and appends the new one, so recently promoted
//! addresses sink to the end of the list.
//!
//! # Primary slot
//!
//! [`AddressBook::set_primary`] models the connected wallet. Moving the slot
//! demotes the old holder to `PreviousPrimary` instead of removing it.
//!
//! The book is shared between widget instances through an `Arc`; every
//! mutation runs under one store-wide lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use magic_address_types::{parse_address, Address};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Display text of the primary slot.
pub const CONNECTED_WALLET_LABEL: &str = "Connected wallet";

/// Display text of a demoted primary.
pub const PREVIOUS_WALLET_LABEL: &str = "Prev. connected wallet";

/// Label attached to a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// The currently connected identity.
    Primary,
    /// A formerly connected identity.
    PreviousPrimary,
    /// Free text supplied by the user or a known-identifier source.
    Custom(String),
}

impl Label {
    /// A custom label, or `None` when `text` is blank.
    pub fn custom(text: impl Into<String>) -> Option<Label> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Label::Custom(text))
        }
    }

    pub fn rank(&self) -> LabelRank {
        match self {
            Label::Primary => LabelRank::Primary,
            Label::PreviousPrimary => LabelRank::PreviousPrimary,
            Label::Custom(_) => LabelRank::Custom,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Label::Primary => CONNECTED_WALLET_LABEL,
            Label::PreviousPrimary => PREVIOUS_WALLET_LABEL,
            Label::Custom(text) => text,
        }
    }
}

/// Total order used to decide whether a merge replaces a stored label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelRank {
    Absent,
    Custom,
    PreviousPrimary,
    Primary,
}

impl LabelRank {
    pub fn of(label: Option<&Label>) -> Self {
        label.map(Label::rank).unwrap_or(LabelRank::Absent)
    }
}

/// One address book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub address: Address,
    pub label: Option<Label>,
    /// When the entry was registered; drives the age label of unlabeled entries.
    pub added_at: Option<DateTime<Utc>>,
}

impl Suggestion {
    pub fn new(address: Address, label: Option<Label>, added_at: Option<DateTime<Utc>>) -> Self {
        Self {
            address,
            label,
            added_at,
        }
    }

    /// Text shown next to the address in the suggestion list.
    ///
    /// Explicit labels are shown as-is. Unlabeled entries with a timestamp get
    /// an age label computed against `now`; this is never cached, so callers
    /// must pass the read time on every render.
    pub fn display_label(&self, now: DateTime<Utc>) -> Option<String> {
        match (&self.label, self.added_at) {
            (Some(label), _) => Some(label.text().to_string()),
            (None, Some(added_at)) => Some(age_label(added_at, now)),
            (None, None) => None,
        }
    }
}

/// "added <N><unit> ago" using the largest whole unit among s, m, h.
pub fn age_label(added_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - added_at).num_seconds().max(0);
    if secs < 60 {
        format!("added {}s ago", secs)
    } else if secs < 3600 {
        format!("added {}m ago", secs / 60)
    } else {
        format!("added {}h ago", secs / 3600)
    }
}

/// What a merge did to the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New address appended.
    Inserted,
    /// Existing entry replaced by a higher-ranked label and moved to the end.
    Replaced,
    /// Existing entry kept untouched.
    Unchanged,
}

/// Shared, lock-protected suggestion registry.
#[derive(Debug, Default)]
pub struct AddressBook {
    entries: Mutex<Vec<Suggestion>>,
}

fn merge_locked(
    entries: &mut Vec<Suggestion>,
    address: Address,
    label: Option<Label>,
    added_at: Option<DateTime<Utc>>,
) -> MergeOutcome {
    let Some(pos) = entries.iter().position(|s| s.address == address) else {
        entries.push(Suggestion::new(address, label, added_at));
        return MergeOutcome::Inserted;
    };
    if LabelRank::of(label.as_ref()) <= LabelRank::of(entries[pos].label.as_ref()) {
        return MergeOutcome::Unchanged;
    }
    entries.remove(pos);
    entries.push(Suggestion::new(address, label, added_at));
    MergeOutcome::Replaced
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh book behind an `Arc`, ready to hand to several widgets.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Merge `address` with an optional label and registration time.
    ///
    /// See the module docs for the priority rule. A losing merge does not
    /// refresh `added_at` and does not move the entry.
    pub fn merge(
        &self,
        address: Address,
        label: Option<Label>,
        added_at: Option<DateTime<Utc>>,
    ) -> MergeOutcome {
        let outcome = merge_locked(&mut self.entries.lock(), address, label, added_at);
        trace!(%address, ?outcome, "address book merge");
        outcome
    }

    /// Merge an address given as text. Malformed input is dropped and yields `None`.
    pub fn merge_str(
        &self,
        identifier: &str,
        label: Option<Label>,
        added_at: Option<DateTime<Utc>>,
    ) -> Option<MergeOutcome> {
        match parse_address(identifier) {
            Some(address) => Some(self.merge(address, label, added_at)),
            None => {
                debug!(identifier, "ignoring malformed address");
                None
            }
        }
    }

    /// Merge a batch under a single lock acquisition.
    pub fn merge_many(
        &self,
        items: impl IntoIterator<Item = (Address, Option<Label>, Option<DateTime<Utc>>)>,
    ) -> Vec<MergeOutcome> {
        let mut entries = self.entries.lock();
        items
            .into_iter()
            .map(|(address, label, added_at)| merge_locked(&mut entries, address, label, added_at))
            .collect()
    }

    /// Move the primary slot to `address`.
    ///
    /// Returns `false` when `address` already holds the slot. Otherwise the
    /// current holder (if any) becomes `PreviousPrimary`, any existing entry for
    /// `address` is dropped, and `address` is appended as `Primary`.
    pub fn set_primary(&self, address: Address) -> bool {
        let mut entries = self.entries.lock();
        if entries
            .iter()
            .any(|s| s.address == address && s.label == Some(Label::Primary))
        {
            return false;
        }
        for suggestion in entries.iter_mut() {
            if suggestion.label == Some(Label::Primary) {
                suggestion.label = Some(Label::PreviousPrimary);
            }
        }
        entries.retain(|s| s.address != address);
        entries.push(Suggestion::new(address, Some(Label::Primary), None));
        debug!(%address, "primary address changed");
        true
    }

    /// Text variant of [`set_primary`](Self::set_primary); malformed input is ignored.
    pub fn set_primary_str(&self, identifier: &str) -> bool {
        match parse_address(identifier) {
            Some(address) => self.set_primary(address),
            None => {
                debug!(identifier, "ignoring malformed primary address");
                false
            }
        }
    }

    pub fn get(&self, address: &Address) -> Option<Suggestion> {
        self.entries
            .lock()
            .iter()
            .find(|s| &s.address == address)
            .cloned()
    }

    pub fn primary(&self) -> Option<Address> {
        self.entries
            .lock()
            .iter()
            .find(|s| s.label == Some(Label::Primary))
            .map(|s| s.address)
    }

    /// Snapshot of all entries in list order.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
