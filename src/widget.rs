//! Async driver for one address field.
//!
//! [`AddressInput`] wires a [`Coordinator`] to a resolver. Host events are
//! plain synchronous calls; lookups run as tasks in a [`JoinSet`] and the
//! host pumps them with [`AddressInput::step`], typically from its event loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(line) = input_lines.recv() => { input.on_change(line); }
//!         Some(effects) = input.step() => handle(effects),
//!     }
//! }
//! ```
//!
//! Dropping the driver aborts every outstanding lookup. The debounce timer is
//! only a deadline inside the coordinator, so nothing outlives the driver.

use std::future;
use std::sync::Arc;

use magic_address_types::Address;
use magic_resolver::{NameResolver, ResolveOptions};
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::address_book::AddressBook;
use crate::config::InputConfig;
use crate::coordinator::{Completion, Coordinator, Effect, LookupRequest, Outcome, Query, Transition};
use crate::outside::{OutsideGuard, Point, Rect};
use crate::view::InputView;

/// Run one lookup against `resolver`.
pub async fn run_lookup<R: NameResolver + ?Sized>(
    resolver: &R,
    options: &ResolveOptions,
    request: LookupRequest,
) -> Completion {
    let LookupRequest { key, query } = request;
    let outcome = match query {
        Query::Forward { name } => Outcome::Forward(resolver.resolve_name(&name, options).await),
        Query::Reverse { address } => {
            Outcome::Reverse(resolver.lookup_address(&address, options).await)
        }
        Query::Avatar { name } => Outcome::Avatar(resolver.resolve_avatar(&name, options).await),
    };
    Completion { key, outcome }
}

fn now() -> std::time::Instant {
    Instant::now().into_std()
}

pub struct AddressInput<R> {
    coordinator: Coordinator,
    resolver: Arc<R>,
    options: ResolveOptions,
    hide_address_text: bool,
    in_flight: JoinSet<Completion>,
    guard: OutsideGuard,
}

impl<R: NameResolver + 'static> AddressInput<R> {
    pub fn new(config: &InputConfig, book: Arc<AddressBook>, resolver: Arc<R>) -> Self {
        Self {
            coordinator: Coordinator::new(config, book),
            resolver,
            options: config.resolve.clone(),
            hide_address_text: config.hide_address_text,
            in_flight: JoinSet::new(),
            guard: OutsideGuard::default(),
        }
    }

    /// The user edited the field. Returns the effects that apply immediately.
    pub fn on_change(&mut self, raw: impl Into<String>) -> Vec<Effect> {
        let transition = self.coordinator.on_change(raw, now());
        self.absorb(transition)
    }

    /// The user picked `address` from the suggestion list.
    pub fn select_suggestion(&mut self, address: Address) -> Vec<Effect> {
        let transition = self.coordinator.select_suggestion(address, now());
        self.absorb(transition)
    }

    pub fn toggle_suggestions(&mut self) {
        self.coordinator.toggle_suggestions();
    }

    pub fn close_suggestions(&mut self) {
        self.coordinator.close_suggestions();
    }

    /// Where the widget sits on screen, for outside-press detection.
    pub fn set_region(&mut self, region: Rect) {
        self.guard.set_region(region);
    }

    /// A pointer went down somewhere. Returns whether the panel was dismissed.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        let open = self.coordinator.suggestions_open();
        let coordinator = &mut self.coordinator;
        self.guard
            .on_pointer_down(point, open, || coordinator.close_suggestions())
    }

    /// Wait for the next debounce deadline or lookup completion and apply it.
    ///
    /// Returns `None` when nothing is outstanding. A completion that arrives
    /// stale yields `Some` with no effects. Cancel-safe: dropping the future
    /// loses nothing, the next call picks up where this one stopped.
    pub async fn step(&mut self) -> Option<Vec<Effect>> {
        let deadline = self.coordinator.next_deadline();
        if deadline.is_none() && self.in_flight.is_empty() {
            return None;
        }
        let debounce = async {
            match deadline {
                Some(deadline) => sleep_until(Instant::from_std(deadline)).await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            _ = debounce => {
                let transition = self.coordinator.poll(now());
                Some(self.absorb(transition))
            }
            Some(joined) = self.in_flight.join_next() => match joined {
                Ok(completion) => {
                    let transition = self.coordinator.apply(completion, now());
                    Some(self.absorb(transition))
                }
                Err(err) => {
                    warn!(error = %err, "lookup task did not complete");
                    Some(Vec::new())
                }
            },
        }
    }

    /// Step until nothing is outstanding, collecting every effect.
    ///
    /// Never returns while a lookup is stuck in the resolver; wrap it in a
    /// timeout when the resolver is not trusted to answer.
    pub async fn settle(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(more) = self.step().await {
            effects.extend(more);
        }
        effects
    }

    fn absorb(&mut self, transition: Transition) -> Vec<Effect> {
        let Transition { effects, lookups } = transition;
        for request in lookups {
            debug!(key = %request.key, query = ?request.query, "dispatching lookup");
            let resolver = Arc::clone(&self.resolver);
            let options = self.options.clone();
            self.in_flight
                .spawn(async move { run_lookup(resolver.as_ref(), &options, request).await });
        }
        effects
    }

    pub fn view(&self) -> InputView {
        InputView::build(&self.coordinator, self.hide_address_text)
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn book(&self) -> &Arc<AddressBook> {
        self.coordinator.book()
    }

    pub fn resolver(&self) -> &Arc<R> {
        &self.resolver
    }

    /// Lookups spawned and not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
