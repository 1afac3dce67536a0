//! Call-site registry
//!
//! Maps each distinct call site to a dense handle, assigned in first-seen
//! order starting at 0. Entries are never evicted: the registry is bounded by
//! the number of instrumented source locations, not by call volume.

use crate::site::{CallSite, Handle};
use fnv::FnvHashMap;

/// A registered call site and what was learned about it on first sight
#[derive(Debug, Clone, Copy)]
pub struct SiteEntry {
    pub site: CallSite,
    /// Instruction pointer of the calling frame, if it could be located
    pub pc: Option<usize>,
}

/// Call-site to handle mapping
#[derive(Debug, Default)]
pub struct Registry {
    handles: FnvHashMap<CallSite, Handle>,
    /// Indexed by handle
    entries: Vec<SiteEntry>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the handle for `site`, registering it if unseen
    ///
    /// `locate` is only invoked for a new site, keeping repeat lookups to a
    /// single hash probe.
    pub fn resolve<F>(&mut self, site: CallSite, locate: F) -> Handle
    where
        F: FnOnce(&CallSite) -> Option<usize>,
    {
        if let Some(&handle) = self.handles.get(&site) {
            return handle;
        }

        let handle = Handle::new(self.entries.len());
        let pc = locate(&site);
        self.entries.push(SiteEntry { site, pc });
        self.handles.insert(site, handle);

        tracing::debug!(%handle, %site, pc = ?pc, "registered call site");
        handle
    }

    /// Entry for a handle issued by this registry
    pub fn get(&self, handle: Handle) -> Option<&SiteEntry> {
        self.entries.get(handle.index())
    }

    /// Number of distinct call sites seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in handle order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &SiteEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (Handle::new(index), entry))
    }
}
