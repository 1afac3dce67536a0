//! Callprof - call-site profiler with ranked hit and time reports
//!
//! Code marks the start and end of a region with `enter()` and `exit()`.
//! Time is attributed to the unique source location that called `enter()`,
//! and on demand a report lists every call site with its hits, total time,
//! and time per hit, most expensive first.
//!
//! - [`site`]: call-site identity and handles
//! - [`registry`]: call site to handle mapping, first-seen order
//! - [`tracker`]: per-handle interval stacks (recursion safe)
//! - [`report`]: ranking and rendering
//! - [`profiler`]: the explicit profiling context
//! - [`global`]: process-wide `initialize`/`enter`/`exit`/`finalize`

pub mod caller;
pub mod cli;
pub mod error;
pub mod global;
pub mod profiler;
pub mod registry;
pub mod report;
pub mod site;
pub mod tracker;

pub use error::{ProfilerError, Result};
pub use profiler::Profiler;
pub use report::{Report, ReportEntry};
pub use site::{CallSite, Handle};
