//! Cancelable, fire-once scheduled tasks.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock backed by tokio's time driver (honours `tokio::time::pause`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct Pending<T> {
    deadline: Instant,
    payload: T,
}

/// A single slot holding at most one scheduled payload.
///
/// Scheduling replaces (cancels) whatever was pending. A payload fires at most
/// once, on the first [`fire`](Self::fire) at or after its deadline.
#[derive(Debug)]
pub struct ScheduledTask<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> ScheduledTask<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `payload` to fire `delay` after `now`.
    ///
    /// Returns the payload that was superseded, if any.
    pub fn schedule(&mut self, payload: T, now: Instant) -> Option<T> {
        let previous = self.pending.replace(Pending {
            deadline: now + self.delay,
            payload,
        });
        previous.map(|p| p.payload)
    }

    /// Cancel the pending payload without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending payload becomes due.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending payload if its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        self.cancel()
    }
}
