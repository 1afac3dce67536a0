//! Process-wide profiler
//!
//! A single [`Profiler`] behind a mutex, for hosts that instrument code far
//! from where a context could be threaded through. Lifecycle:
//! `initialize()` once, `enter()`/`exit()` from anywhere, `finalize()` once
//! instrumented work has stopped.
//!
//! Every call site keeps one stack of open regions. Threads that enter the
//! same call site concurrently share it, and exits pair with the most recent
//! entry regardless of thread.
//!
//! # Example
//! ```
//! use callprof::global;
//!
//! fn work() -> callprof::Result<()> {
//!     let handle = global::enter()?;
//!     // ... timed region ...
//!     global::exit(handle)?;
//!     Ok(())
//! }
//!
//! global::initialize().unwrap();
//! work().unwrap();
//! global::finalize().unwrap();
//! ```

use crate::error::{ProfilerError, Result};
use crate::profiler::Profiler;
use crate::report::Report;
use crate::site::{CallSite, Handle};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

/// Global profiling context
static CONTEXT: OnceLock<Mutex<Profiler>> = OnceLock::new();

/// Establish the process-wide profiler
///
/// Fails with [`ProfilerError::AlreadyInitialized`] on a second call.
pub fn initialize() -> Result<()> {
    CONTEXT
        .set(Mutex::new(Profiler::new()))
        .map_err(|_| ProfilerError::AlreadyInitialized)?;
    tracing::debug!("global profiler initialized");
    Ok(())
}

/// Whether `initialize()` has run
pub fn is_initialized() -> bool {
    CONTEXT.get().is_some()
}

fn context() -> Result<MutexGuard<'static, Profiler>> {
    let mutex = CONTEXT.get().ok_or(ProfilerError::NotInitialized)?;
    // A panic in instrumented code leaves the accounting usable
    Ok(mutex.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Open a timed region attributed to the caller's source location
#[track_caller]
pub fn enter() -> Result<Handle> {
    Ok(context()?.enter())
}

/// Close the most recent open region for `handle`
pub fn exit(handle: Handle) -> Result<Duration> {
    context()?.exit(handle)
}

/// Source location behind `handle`
pub fn site(handle: Handle) -> Result<Option<CallSite>> {
    Ok(context()?.site(handle))
}

/// Ranked report of the global profiler, without printing it
pub fn report() -> Result<Report> {
    Ok(context()?.report())
}

/// Print the ranked report to stdout
pub fn finalize() -> Result<()> {
    context()?.finalize()
}

/// Open a region that closes when the returned guard is dropped
#[track_caller]
pub fn span() -> Result<Span> {
    Ok(Span {
        handle: Some(enter()?),
    })
}

/// Guard for a region opened with [`span()`]
#[derive(Debug)]
#[must_use = "dropping the span immediately closes its region"]
pub struct Span {
    handle: Option<Handle>,
}

impl Span {
    /// Handle of the open region
    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    /// Close the region now and return its duration
    pub fn finish(mut self) -> Result<Duration> {
        match self.handle.take() {
            Some(handle) => exit(handle),
            None => Ok(Duration::ZERO),
        }
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = exit(handle) {
                tracing::error!(%handle, error = %e, "failed to close profiled span");
            }
        }
    }
}

/// Time the rest of the enclosing scope with the global profiler
///
/// Propagates [`ProfilerError`] with `?`, so the enclosing function must
/// return a compatible `Result`.
///
/// ```
/// fn parse() -> anyhow::Result<()> {
///     callprof::profile_scope!();
///     // ... timed until the end of the function ...
///     Ok(())
/// }
/// # callprof::global::initialize().unwrap();
/// # parse().unwrap();
/// ```
#[macro_export]
macro_rules! profile_scope {
    () => {
        let _callprof_span = $crate::global::span()?;
    };
}
