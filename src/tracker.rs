//! Interval accounting per call site
//!
//! Each handle owns a LIFO stack of entry timestamps. An exit pairs with the
//! most recent open entry on the same handle, so recursive or reentrant
//! regions sharing one call site are each timed from their own entry.
//!
//! Timestamps are passed in by the caller; the profiler feeds
//! `Instant::now()`, which is monotonic.

use crate::error::{ProfilerError, Result};
use crate::site::Handle;
use std::time::{Duration, Instant};

/// Accounting for a single call site
#[derive(Debug, Clone, Default)]
pub struct SiteTiming {
    /// Number of entries (only grows, only on enter)
    pub hits: u64,
    /// Sum of closed interval durations (only grows, only on exit)
    pub time_spent: Duration,
    /// Entry timestamps of intervals not yet exited
    open: Vec<Instant>,
}

impl SiteTiming {
    /// Number of intervals entered but not yet exited
    pub fn depth(&self) -> usize {
        self.open.len()
    }
}

/// Tracks open intervals and accumulated time, indexed by handle
#[derive(Debug, Default)]
pub struct IntervalTracker {
    sites: Vec<SiteTiming>,
}

impl IntervalTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an interval for `handle` starting at `now`
    pub fn enter(&mut self, handle: Handle, now: Instant) {
        let index = handle.index();
        if index >= self.sites.len() {
            self.sites.resize_with(index + 1, SiteTiming::default);
        }

        let timing = &mut self.sites[index];
        timing.open.push(now);
        timing.hits += 1;
    }

    /// Close the most recent open interval for `handle` at `now`
    ///
    /// Returns the duration of the closed interval. Nothing is recorded when
    /// there is no open interval to close.
    pub fn exit(&mut self, handle: Handle, now: Instant) -> Result<Duration> {
        let timing = self
            .sites
            .get_mut(handle.index())
            .ok_or(ProfilerError::UnknownHandle { handle })?;

        let entered = timing
            .open
            .pop()
            .ok_or(ProfilerError::UnbalancedExit { handle })?;

        let elapsed = now.saturating_duration_since(entered);
        timing.time_spent += elapsed;
        Ok(elapsed)
    }

    /// Accounting for `handle`, if it was ever entered
    pub fn get(&self, handle: Handle) -> Option<&SiteTiming> {
        self.sites.get(handle.index())
    }

    pub fn hits(&self, handle: Handle) -> u64 {
        self.get(handle).map_or(0, |t| t.hits)
    }

    pub fn time_spent(&self, handle: Handle) -> Duration {
        self.get(handle).map_or(Duration::ZERO, |t| t.time_spent)
    }

    pub fn depth(&self, handle: Handle) -> usize {
        self.get(handle).map_or(0, SiteTiming::depth)
    }
}
