//! Call-site profiler context
//!
//! Owns the registry and the interval tracker. The context is an explicit
//! value so independent profilers can coexist (one per test, per subsystem);
//! see [`crate::global`] for the process-wide facade.
//!
//! # Example
//! ```
//! use callprof::Profiler;
//!
//! let mut profiler = Profiler::new();
//! for _ in 0..3 {
//!     let handle = profiler.enter();
//!     // ... timed region ...
//!     profiler.exit(handle).unwrap();
//! }
//! assert_eq!(profiler.len(), 1);
//! assert_eq!(profiler.report().entries()[0].hits, 3);
//! ```

use crate::caller;
use crate::error::{ProfilerError, Result};
use crate::registry::Registry;
use crate::report::{Report, SiteRecord};
use crate::site::{CallSite, Handle};
use crate::tracker::IntervalTracker;
use std::io;
use std::time::{Duration, Instant};

/// Profiling context tracking hits and time per call site
#[derive(Debug, Default)]
pub struct Profiler {
    registry: Registry,
    tracker: IntervalTracker,
}

impl Profiler {
    /// Create an empty profiling context
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a timed region attributed to the caller's source location
    ///
    /// The first call from a given location walks the stack once to remember
    /// the calling frame; later calls are a hash lookup and a push.
    #[track_caller]
    pub fn enter(&mut self) -> Handle {
        let site = CallSite::caller();
        let handle = self.registry.resolve(site, caller::locate);
        self.tracker.enter(handle, Instant::now());
        tracing::trace!(%handle, "enter");
        handle
    }

    /// Close the most recent open region for `handle`
    ///
    /// Returns the duration of the closed region.
    pub fn exit(&mut self, handle: Handle) -> Result<Duration> {
        let now = Instant::now();
        if self.registry.get(handle).is_none() {
            return Err(ProfilerError::UnknownHandle { handle });
        }
        let elapsed = self.tracker.exit(handle, now)?;
        tracing::trace!(%handle, elapsed_ns = elapsed.as_nanos() as u64, "exit");
        Ok(elapsed)
    }

    /// Time `f` as one region at the caller's location
    ///
    /// `f` receives the profiler back, so nested and recursive regions can
    /// be measured inside it.
    ///
    /// # Example
    /// ```
    /// use callprof::Profiler;
    ///
    /// let mut profiler = Profiler::new();
    /// let value = profiler.measure(|_| 6 * 7).unwrap();
    /// assert_eq!(value, 42);
    /// ```
    #[track_caller]
    pub fn measure<F, R>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> R,
    {
        let handle = self.enter();
        let result = f(self);
        self.exit(handle)?;
        Ok(result)
    }

    /// Hits recorded for `handle`
    pub fn hits(&self, handle: Handle) -> u64 {
        self.tracker.hits(handle)
    }

    /// Accumulated time of closed regions for `handle`
    pub fn time_spent(&self, handle: Handle) -> Duration {
        self.tracker.time_spent(handle)
    }

    /// Regions entered but not yet exited for `handle`
    pub fn depth(&self, handle: Handle) -> usize {
        self.tracker.depth(handle)
    }

    /// Source location behind `handle`
    pub fn site(&self, handle: Handle) -> Option<CallSite> {
        self.registry.get(handle).map(|entry| entry.site)
    }

    /// Number of distinct call sites seen
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Snapshot of every registered call site in handle order
    pub fn records(&self) -> Vec<SiteRecord> {
        self.registry
            .iter()
            .map(|(handle, entry)| SiteRecord {
                handle,
                site: entry.site,
                pc: entry.pc,
                hits: self.tracker.hits(handle),
                time_spent: self.tracker.time_spent(handle),
            })
            .collect()
    }

    /// Ranked report with function names resolved from debug info
    ///
    /// Reads the accounting without clearing it.
    pub fn report(&self) -> Report {
        Report::build(self.records(), |record| {
            record
                .pc
                .and_then(|pc| caller::symbol_name(&record.site, pc))
        })
    }

    /// Print the ranked report to stdout
    pub fn finalize(&self) -> Result<()> {
        let report = self.report();
        tracing::info!(call_sites = report.len(), "finalizing profile");
        report.write_to(io::stdout().lock())?;
        Ok(())
    }
}
