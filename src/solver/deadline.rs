//! Cooperative wall-clock budget for a single search call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A polled time budget, optionally tied to an external cancellation flag.
///
/// The search checks [`Deadline::expired`] once at the top of each recursive
/// call, so a candidate loop already in flight finishes its current step
/// before the search unwinds.
#[derive(Debug, Clone)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Deadline {
    /// Starts the clock now. `None` means no time limit.
    pub fn start(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
            cancel: None,
        }
    }

    pub fn unlimited() -> Self {
        Self::start(None)
    }

    /// Also expires once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[inline]
    pub fn expired(&self) -> bool {
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return true;
        }
        self.budget
            .is_some_and(|budget| self.started.elapsed() >= budget)
    }
}

/// Converts a timeout in fractional seconds. Negative or non-finite
/// values yield `None` (no limit).
pub fn seconds(timeout: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(timeout).ok()
}
