//! Ranked call-site report
//!
//! Snapshots every registered call site with its hits and accumulated time,
//! orders them by time spent (descending), and renders one line per site:
//!
//! ```text
//! app::parse_header(): 3 hits, 30412.07 micros, 10137.36 micros/hit
//! ```

use crate::site::{CallSite, Handle};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// Accounting snapshot for one call site
#[derive(Debug, Clone)]
pub struct SiteRecord {
    pub handle: Handle,
    pub site: CallSite,
    /// Instruction pointer of the calling frame, if located
    pub pc: Option<usize>,
    pub hits: u64,
    pub time_spent: Duration,
}

/// One rendered report line
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// Function name, or `file:line:column` when no symbol was found
    pub name: String,
    /// Whether `name` came from debug info
    pub symbolized: bool,
    pub site: CallSite,
    pub hits: u64,
    /// Total time in microseconds
    pub micros: f64,
    /// Average time per hit in microseconds
    pub micros_per_hit: f64,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parens = if self.symbolized { "()" } else { "" };
        write!(
            f,
            "{}{}: {} hits, {:.2} micros, {:.2} micros/hit",
            self.name, parens, self.hits, self.micros, self.micros_per_hit
        )
    }
}

/// Call sites ranked by time spent, most expensive first
#[derive(Debug, Clone, Default)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Rank `records` and resolve a display name for each
    ///
    /// Ties in time spent keep handle order.
    pub fn build<F>(mut records: Vec<SiteRecord>, mut symbolize: F) -> Self
    where
        F: FnMut(&SiteRecord) -> Option<String>,
    {
        // Sort by total time (descending); sort_by is stable
        records.sort_by(|a, b| b.time_spent.cmp(&a.time_spent));

        let entries = records
            .iter()
            .map(|record| {
                let symbol = symbolize(record);
                let symbolized = symbol.is_some();
                let name = symbol.unwrap_or_else(|| record.site.to_string());
                let micros = record.time_spent.as_nanos() as f64 / 1000.0;
                ReportEntry {
                    name,
                    symbolized,
                    site: record.site,
                    hits: record.hits,
                    micros,
                    micros_per_hit: per_hit(record, micros),
                }
            })
            .collect();

        Self { entries }
    }

    /// Entries in ranked order
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write one line per call site
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "{}", entry)?;
        }
        out.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Average microseconds per hit
///
/// A registered site always has at least one hit; a zero-hit record reports 0.
fn per_hit(record: &SiteRecord, micros: f64) -> f64 {
    if record.hits == 0 {
        tracing::warn!(handle = %record.handle, site = %record.site, "call site with zero hits");
        return 0.0;
    }
    micros / record.hits as f64
}
