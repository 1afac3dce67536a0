//! Program-counter capture and symbolization for call sites
//!
//! Identity never depends on this module: a `CallSite` comes from the
//! compiler-provided location. The instruction pointer is only used to turn a
//! site back into a function name for the report, so every failure here
//! degrades to a `file:line:column` label instead of an error.
//!
//! # Algorithm
//!
//! 1. Walk the current stack with the `backtrace` crate
//! 2. Resolve each frame, including inlined symbols, against debug info
//! 3. The first frame with a symbol located at the call site's file and line
//!    is the caller; its instruction pointer is kept
//!
//! Binaries without debug info never match, and the site keeps no pc.

use crate::site::CallSite;
use backtrace::Symbol;
use std::ffi::c_void;
use std::path::Path;

/// Maximum stack depth to walk (prevent pathological unwinds)
const MAX_STACK_DEPTH: usize = 128;

/// Find the address of the call instruction that executed `site`
#[inline(never)]
pub fn locate(site: &CallSite) -> Option<usize> {
    let mut found = None;
    let mut depth = 0;

    backtrace::trace(|frame| {
        depth += 1;
        let mut matched = false;
        backtrace::resolve_frame(frame, |symbol| {
            matched |= symbol_at(symbol, site);
        });

        if matched {
            // Return address minus one stays inside the call instruction,
            // which is what `resolve_frame` looked up
            found = Some((frame.ip() as usize).saturating_sub(1));
            return false;
        }
        depth < MAX_STACK_DEPTH
    });

    if found.is_none() {
        tracing::debug!(%site, "no stack frame matched call site");
    }
    found
}

/// Resolve a call site's instruction pointer to a demangled function name
///
/// Prefers the (possibly inlined) symbol whose location is the site itself,
/// falling back to the first named symbol at `pc`.
pub fn symbol_name(site: &CallSite, pc: usize) -> Option<String> {
    let mut exact = None;
    let mut first = None;

    backtrace::resolve(pc as *mut c_void, |symbol| {
        let Some(name) = symbol.name() else {
            return;
        };
        // `{:#}` drops the trailing hash of legacy mangled names
        let name = format!("{:#}", name);
        if exact.is_none() && symbol_at(symbol, site) {
            exact = Some(name.clone());
        }
        first.get_or_insert(name);
    });

    exact.or(first)
}

/// Whether a resolved symbol's source position is the call site
fn symbol_at(symbol: &Symbol, site: &CallSite) -> bool {
    match (symbol.filename(), symbol.lineno()) {
        (Some(file), Some(line)) => line == site.line && same_file(file, site.file),
        _ => false,
    }
}

/// Debug info may carry absolute paths while locations are crate-relative
fn same_file(debug_path: &Path, location_file: &str) -> bool {
    debug_path.ends_with(location_file)
}
