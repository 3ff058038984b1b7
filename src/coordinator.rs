//! Resolution coordinator for the address field.
//!
//! The coordinator is a synchronous state machine. It never awaits anything:
//! every entry point returns a [`Transition`] listing the effects for the host
//! and the lookups the caller must start. Finished lookups come back through
//! [`Coordinator::apply`]. The async driver in [`crate::widget`] does that
//! plumbing; tests can do it by hand.
//!
//! # Lifecycle per settled value
//!
//! ```text
//! Idle -> Pending -> Found | NotFound | Failed
//! ```
//!
//! Whenever the settled value changes (including becoming absent because the
//! user typed past the debounced value) all lookup state resets and lookups
//! for the new value, if any, are requested.
//!
//! # Staleness
//!
//! Every request carries the settled value it was issued for. A completion is
//! applied only if that value is still the current settled value; otherwise it
//! is dropped without touching state, the address book or the host. Lookups
//! are never cancelled at the transport level.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use magic_address_types::{is_address, Address, AliasRules};
use tracing::{debug, info, warn};

use crate::address_book::{AddressBook, Label, MergeOutcome};
use crate::config::InputConfig;
use crate::debounce::Debouncer;
use crate::error::ResolutionError;
use crate::session::{Session, SettledKind};

/// Progress of one lookup for the current settled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupState<T> {
    /// Nothing settled yet.
    Idle,
    /// The settled value is not eligible for this lookup.
    NotApplicable,
    Pending,
    Found(T),
    NotFound,
    /// Transport failure, with the resolver's message.
    Failed(String),
}

impl<T> LookupState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, LookupState::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LookupState::Found(_) | LookupState::NotFound | LookupState::Failed(_)
        )
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            LookupState::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// A lookup the caller must run against the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Settled value the request belongs to.
    pub key: String,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Forward { name: String },
    Reverse { address: Address },
    Avatar { name: String },
}

/// A finished lookup, handed back to [`Coordinator::apply`].
#[derive(Debug)]
pub struct Completion {
    pub key: String,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Outcome {
    Forward(anyhow::Result<Option<Address>>),
    Reverse(anyhow::Result<Option<String>>),
    Avatar(anyhow::Result<Option<String>>),
}

/// Something the host should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The field value was rewritten by the widget.
    SetValue(String),
    /// An address book entry was added or relabelled.
    Registered {
        address: Address,
        label: Option<Label>,
    },
    /// The typed alias could not be resolved; mark the field invalid.
    Invalid(ResolutionError),
}

/// Output of one coordinator step.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Transition {
    pub effects: Vec<Effect>,
    pub lookups: Vec<LookupRequest>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.lookups.is_empty()
    }
}

/// State machine behind one address field.
#[derive(Debug)]
pub struct Coordinator {
    alias_rules: AliasRules,
    disabled: bool,
    book: Arc<AddressBook>,
    value: String,
    debouncer: Debouncer<String>,
    settled: Option<String>,
    forward: LookupState<Address>,
    reverse: LookupState<String>,
    avatar: LookupState<String>,
    override_label: Option<String>,
    refocus: bool,
    suggestions_open: bool,
}

#[allow(clippy::ptr_arg)]
fn bypass_debounce(value: &String) -> bool {
    is_address(value)
}

impl Coordinator {
    pub fn new(config: &InputConfig, book: Arc<AddressBook>) -> Self {
        let mut coordinator = Self {
            alias_rules: config.alias_rules(),
            disabled: config.disabled,
            book,
            value: String::new(),
            debouncer: Debouncer::with_bypass(String::new(), config.debounce(), bypass_debounce),
            settled: None,
            forward: LookupState::Idle,
            reverse: LookupState::Idle,
            avatar: LookupState::Idle,
            override_label: None,
            refocus: false,
            suggestions_open: false,
        };
        let mut initial = Transition::default();
        coordinator.resettle(&mut initial);
        coordinator
    }

    /// The user edited the field.
    ///
    /// Clears the alias override and the refocus latch. A well-formed address
    /// is registered in the address book right away, unlabeled.
    pub fn on_change(&mut self, raw: impl Into<String>, now: Instant) -> Transition {
        let raw = raw.into();
        let mut transition = Transition::default();
        self.override_label = None;
        self.refocus = false;
        self.write_value(raw.clone(), now);
        if let Ok(address) = raw.parse::<Address>() {
            self.register(address, None, &mut transition);
        }
        self.resettle(&mut transition);
        transition
    }

    /// The user picked an entry from the suggestion list.
    ///
    /// Overrides whatever was pending: the field takes the address, the alias
    /// override is cleared and the list closes.
    pub fn select_suggestion(&mut self, address: Address, now: Instant) -> Transition {
        let mut transition = Transition::default();
        self.override_label = None;
        self.refocus = false;
        self.suggestions_open = false;
        self.debouncer.cancel();
        let value = address.to_string();
        self.write_value(value.clone(), now);
        transition.effects.push(Effect::SetValue(value));
        self.register(address, None, &mut transition);
        self.resettle(&mut transition);
        transition
    }

    /// Advance the debouncer to `now`.
    pub fn poll(&mut self, now: Instant) -> Transition {
        let mut transition = Transition::default();
        if self.debouncer.poll(now) {
            self.resettle(&mut transition);
        }
        transition
    }

    /// When [`poll`](Self::poll) next needs to run.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Fold a finished lookup into the state, unless it is stale.
    pub fn apply(&mut self, completion: Completion, now: Instant) -> Transition {
        let mut transition = Transition::default();
        let Completion { key, outcome } = completion;
        if self.settled.as_deref() != Some(key.as_str()) {
            debug!(
                key = %key,
                settled = ?self.settled,
                "discarding stale lookup result"
            );
            return transition;
        }
        match outcome {
            Outcome::Forward(result) => self.apply_forward(key, result, now, &mut transition),
            Outcome::Reverse(result) => self.apply_reverse(key, result, &mut transition),
            Outcome::Avatar(result) => self.apply_avatar(key, result),
        }
        transition
    }

    fn apply_forward(
        &mut self,
        key: String,
        result: anyhow::Result<Option<Address>>,
        now: Instant,
        transition: &mut Transition,
    ) {
        if !self.forward.is_pending() {
            return;
        }
        self.refocus = true;
        match result {
            Ok(Some(address)) => {
                info!(name = %key, %address, "alias resolved");
                self.forward = LookupState::Found(address);
                self.override_label = Some(key.clone());
                let value = address.to_string();
                self.write_value(value.clone(), now);
                transition.effects.push(Effect::SetValue(value));
                self.register(address, Label::custom(key), transition);
                self.resettle(transition);
            }
            Ok(None) => {
                debug!(name = %key, "alias not found");
                self.forward = LookupState::NotFound;
                transition
                    .effects
                    .push(Effect::Invalid(ResolutionError::NotFound { input: key }));
            }
            Err(err) => {
                warn!(name = %key, error = %err, "forward lookup failed");
                let message = err.to_string();
                self.forward = LookupState::Failed(message.clone());
                transition
                    .effects
                    .push(Effect::Invalid(ResolutionError::Transport {
                        input: key,
                        message,
                    }));
            }
        }
    }

    fn apply_reverse(
        &mut self,
        key: String,
        result: anyhow::Result<Option<String>>,
        transition: &mut Transition,
    ) {
        if !self.reverse.is_pending() {
            return;
        }
        self.refocus = true;
        match result {
            Ok(Some(name)) => {
                debug!(address = %key, %name, "reverse record found");
                self.reverse = LookupState::Found(name.clone());
                self.avatar = LookupState::Pending;
                transition.lookups.push(LookupRequest {
                    key,
                    query: Query::Avatar { name },
                });
            }
            Ok(None) => {
                self.reverse = LookupState::NotFound;
            }
            Err(err) => {
                warn!(address = %key, error = %err, "reverse lookup failed");
                self.reverse = LookupState::Failed(err.to_string());
            }
        }
    }

    fn apply_avatar(&mut self, key: String, result: anyhow::Result<Option<String>>) {
        if !self.avatar.is_pending() {
            return;
        }
        self.avatar = match result {
            Ok(Some(url)) => LookupState::Found(url),
            Ok(None) => LookupState::NotFound,
            Err(err) => {
                warn!(address = %key, error = %err, "avatar lookup failed");
                LookupState::Failed(err.to_string())
            }
        };
    }

    fn write_value(&mut self, value: String, now: Instant) {
        self.debouncer.push(value.clone(), now);
        self.value = value;
    }

    fn register(&self, address: Address, label: Option<Label>, transition: &mut Transition) {
        let outcome = self.book.merge(address, label.clone(), Some(Utc::now()));
        if outcome != MergeOutcome::Unchanged {
            transition
                .effects
                .push(Effect::Registered { address, label });
        }
    }

    /// Re-derive the session and restart lookups if the settled value moved.
    fn resettle(&mut self, transition: &mut Transition) {
        let settled = Session::derive(&self.value, self.debouncer.settled())
            .settled()
            .map(str::to_owned);
        if settled == self.settled {
            return;
        }
        self.settled = settled;
        self.forward = LookupState::Idle;
        self.reverse = LookupState::Idle;
        self.avatar = LookupState::Idle;

        let Some(key) = self.settled.clone() else {
            return;
        };
        match SettledKind::classify(&key, &self.alias_rules) {
            SettledKind::Alias => {
                debug!(name = %key, "requesting forward lookup");
                self.forward = LookupState::Pending;
                self.reverse = LookupState::NotApplicable;
                transition.lookups.push(LookupRequest {
                    query: Query::Forward { name: key.clone() },
                    key,
                });
            }
            SettledKind::Address(address) => {
                debug!(%address, "requesting reverse lookup");
                self.forward = LookupState::NotApplicable;
                self.reverse = LookupState::Pending;
                transition.lookups.push(LookupRequest {
                    key,
                    query: Query::Reverse { address },
                });
            }
            SettledKind::Other => {
                self.forward = LookupState::NotApplicable;
                self.reverse = LookupState::NotApplicable;
            }
        }
    }

    pub fn toggle_suggestions(&mut self) {
        self.suggestions_open = !self.suggestions_open;
    }

    pub fn close_suggestions(&mut self) {
        self.suggestions_open = false;
    }

    pub fn suggestions_open(&self) -> bool {
        self.suggestions_open
    }

    /// Current field value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn session(&self) -> Session<'_> {
        Session::derive(&self.value, self.debouncer.settled())
    }

    pub fn settled(&self) -> Option<&str> {
        self.settled.as_deref()
    }

    pub fn forward(&self) -> &LookupState<Address> {
        &self.forward
    }

    pub fn reverse(&self) -> &LookupState<String> {
        &self.reverse
    }

    pub fn avatar(&self) -> &LookupState<String> {
        &self.avatar
    }

    /// Alias that produced the last successful forward resolution.
    pub fn override_label(&self) -> Option<&str> {
        self.override_label.as_deref()
    }

    /// Alias to show next to the field: the override wins over the reverse record.
    pub fn display_alias(&self) -> Option<&str> {
        let reverse = self.reverse.found()?;
        Some(self.override_label.as_deref().unwrap_or(reverse))
    }

    /// Set once a forward or reverse lookup finishes; cleared by the next user action.
    pub fn refocus(&self) -> bool {
        self.refocus
    }

    pub fn is_loading(&self) -> bool {
        self.forward.is_pending() || self.reverse.is_pending()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled || self.is_loading()
    }

    pub fn has_error(&self) -> bool {
        matches!(
            self.forward,
            LookupState::NotFound | LookupState::Failed(_)
        )
    }

    pub fn book(&self) -> &Arc<AddressBook> {
        &self.book
    }
}
