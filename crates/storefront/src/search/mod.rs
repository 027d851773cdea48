//! Debounced search.
//!
//! Input-change events are buffered by a [`SearchController`] and turned into
//! at most one backend query per idle period. A [`SearchView`] applies the
//! fired query to its displayed collection through a [`SearchSource`].
//!
//! Time comes from an injected [`Clock`], so the debounce logic is testable
//! without waiting: [`ManualClock`] in unit tests, [`TokioClock`] (which
//! follows tokio's pausable clock) everywhere else.

mod controller;
mod debounce;

pub use controller::{ProductSearch, SearchController, SearchRequest, SearchSource, SearchView};
pub use debounce::{Clock, ManualClock, ScheduledTask, TokioClock};
