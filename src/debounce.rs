//! Deadline-based debouncing of input values.
//!
//! A [`Debouncer`] holds the last settled value and at most one pending value
//! with a due time. It owns no timer: the caller asks for
//! [`deadline`](Debouncer::deadline), sleeps until then however it likes, and
//! calls [`poll`](Debouncer::poll) with the current time. Dropping the
//! debouncer therefore cannot leave a timer behind.
//!
//! Values accepted by the bypass predicate settle immediately. The address
//! field uses this so that pasting a well-formed address costs no latency.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    due: Instant,
}

#[derive(Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    bypass: fn(&T) -> bool,
    settled: T,
    pending: Option<Pending<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("settled", &self.settled)
            .field("pending", &self.pending)
            .finish()
    }
}

fn never<T>(_: &T) -> bool {
    false
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self::with_bypass(initial, delay, never)
    }

    pub fn with_bypass(initial: T, delay: Duration, bypass: fn(&T) -> bool) -> Self {
        Self {
            delay,
            bypass,
            settled: initial,
            pending: None,
        }
    }

    /// Feed a new raw value observed at `now`.
    ///
    /// Returns `true` if the settled value changed right away (bypass hit).
    /// Otherwise the value waits for `delay` of quiet; a newer push restarts
    /// the wait, and pushing the already settled value cancels it.
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        if (self.bypass)(&value) {
            self.pending = None;
            let changed = self.settled != value;
            self.settled = value;
            return changed;
        }
        if value == self.settled {
            self.pending = None;
            return false;
        }
        self.pending = Some(Pending {
            value,
            due: now + self.delay,
        });
        false
    }

    /// Settle the pending value if its due time has passed.
    ///
    /// Returns `true` if the settled value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some(pending) if pending.due <= now => {
                let changed = self.settled != pending.value;
                self.settled = pending.value;
                changed
            }
            not_due => {
                self.pending = not_due;
                false
            }
        }
    }

    /// When the pending value is due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn settled(&self) -> &T {
        &self.settled
    }

    /// Drop the pending value, keeping the settled one.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
