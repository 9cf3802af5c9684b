//! Topology watcher: structural mutations -> debounced registry re-scans
//!
//! Pages add and remove editable surfaces continuously (chat widgets mount
//! lazily, dialogs come and go). The watcher consumes the document's
//! mutation journal and schedules a single-flight, coalesced re-scan rather
//! than scanning on every mutation: a burst of additions within the window
//! collapses into one `ensure_tracked` pass.

use std::time::{Duration, Instant};

use crate::host::{Document, Mutation};
use crate::registry::SurfaceRegistry;
use crate::util::Debounce;

/// Coalescing window for re-scans
pub const RESCAN_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct TopologyWatcher {
    debounce: Debounce,
}

impl Default for TopologyWatcher {
    fn default() -> Self {
        Self {
            debounce: Debounce::new(RESCAN_WINDOW),
        }
    }
}

impl TopologyWatcher {
    /// Feed a drained mutation batch. Additions that are (or contain) an
    /// editable candidate schedule a re-scan; a pending schedule is replaced,
    /// not queued.
    pub fn observe(
        &mut self,
        doc: &Document,
        registry: &SurfaceRegistry,
        mutations: &[Mutation],
        now: Instant,
    ) {
        let relevant = mutations.iter().any(|m| match m {
            Mutation::Added(id) => registry.contains_candidate(doc, *id),
            Mutation::Removed(_) => false,
        });
        if relevant {
            self.debounce.schedule(now);
        }
    }

    /// True once the coalescing window has elapsed; the caller then runs the
    /// actual re-scan
    pub fn rescan_due(&mut self, now: Instant) -> bool {
        self.debounce.fire_due(now)
    }

    pub fn rescan_pending(&self) -> bool {
        self.debounce.is_pending()
    }
}
