//! Call-site identity and handles
//!
//! A call site is the literal source location of an `enter()` call, captured
//! through `#[track_caller]`. Handles are dense integers that index all
//! per-site accounting.

use std::fmt;
use std::panic::Location;

/// Source location that opened a timed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Source file as recorded by the compiler
    pub file: &'static str,
    /// 1-based line number
    pub line: u32,
    /// 1-based column, separates several sites on one line
    pub column: u32,
}

impl CallSite {
    /// Build a call site from a caller location
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }

    /// Call site of whoever called the enclosing `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Opaque identifier for a registered call site
///
/// Returned by `enter()` and handed back unchanged to the matching `exit()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use = "a handle must be passed to exit() to close its interval"]
pub struct Handle(usize);

impl Handle {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this handle in first-seen order, starting at 0
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
