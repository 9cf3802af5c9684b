//! Surface registry: the live set of editable surfaces
//!
//! Tracks every editable surface the user might type into, across the main
//! document, same-origin frames, and shadow roots. Tracking is idempotent:
//! the "listener attached" marker lives on the node itself, so re-scans
//! (which happen continuously as the page mutates) never double-register a
//! surface. The kind tag (flat vs structured) is decided once here and never
//! re-inspected per keystroke.

use std::collections::HashMap;

use crate::host::{Document, NodeId, NodeKind, Selector};
use crate::surface::{SurfaceHandle, SurfaceKind};

/// Input types that hold expandable text. Password fields and non-text
/// inputs (number, date pickers, ...) are never tracked.
const TEXT_INPUT_TYPES: &[&str] = &["", "text", "search", "email", "url", "tel"];

#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    /// Selector patterns for known rich editors and messaging composers,
    /// on top of the built-in editable criteria
    composers: Vec<Selector>,
    surfaces: HashMap<NodeId, SurfaceHandle>,
}

impl SurfaceRegistry {
    pub fn new(composers: Vec<Selector>) -> Self {
        Self {
            composers,
            surfaces: HashMap::new(),
        }
    }

    /// Decide whether `id` is an editable-surface candidate, and of which
    /// kind. This is the single place the editable criteria live.
    pub fn classify(&self, doc: &Document, id: NodeId) -> Option<SurfaceKind> {
        let node = doc.node(id)?;
        match &node.kind {
            NodeKind::Input { input_type, .. } => {
                let ty = input_type.to_ascii_lowercase();
                TEXT_INPUT_TYPES
                    .contains(&ty.as_str())
                    .then_some(SurfaceKind::Flat)
            }
            NodeKind::TextArea { .. } => Some(SurfaceKind::Flat),
            NodeKind::Element => {
                if node.is_content_editable()
                    || self.composers.iter().any(|sel| sel.matches(doc, id))
                {
                    Some(SurfaceKind::Structured)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Idempotently start tracking every candidate in `candidates`.
    ///
    /// Returns the handles that are newly tracked by this call.
    pub fn ensure_tracked(
        &mut self,
        doc: &mut Document,
        candidates: impl IntoIterator<Item = NodeId>,
    ) -> Vec<SurfaceHandle> {
        let mut newly = Vec::new();
        for id in candidates {
            let Some(kind) = self.classify(doc, id) else {
                continue;
            };
            let Some(node) = doc.node_mut(id) else {
                continue;
            };
            if node.tracked {
                // Marker survives re-scans: listeners attach at most once
                continue;
            }
            node.tracked = true;
            let handle = SurfaceHandle { node: id, kind };
            self.surfaces.insert(id, handle);
            tracing::debug!(?id, ?kind, "tracking surface");
            newly.push(handle);
        }
        newly
    }

    /// Walk the whole tree (shadow roots included, same-origin frames
    /// recursed, cross-origin frames silently skipped) and track every
    /// candidate found
    pub fn scan(&mut self, doc: &mut Document) -> Vec<SurfaceHandle> {
        let mut candidates = Vec::new();
        self.collect_candidates(doc, doc.root(), &mut candidates);
        let newly = self.ensure_tracked(doc, candidates);
        self.sweep(doc);
        newly
    }

    fn collect_candidates(&self, doc: &Document, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = doc.node(id) else { return };
        if let NodeKind::Frame { origin } = &node.kind {
            if origin != doc.origin() {
                // Expected, not exceptional: the host denies access here
                tracing::debug!(%origin, "skipping cross-origin frame");
                return;
            }
        }
        if self.classify(doc, id).is_some() {
            out.push(id);
        }
        for child in &node.children {
            self.collect_candidates(doc, *child, out);
        }
    }

    /// Does the subtree rooted at `id` contain any editable candidate?
    /// (Used by the topology watcher to decide whether an addition warrants
    /// a re-scan.)
    pub fn contains_candidate(&self, doc: &Document, id: NodeId) -> bool {
        let Some(node) = doc.node(id) else {
            return false;
        };
        if self.classify(doc, id).is_some() {
            return true;
        }
        node.children
            .iter()
            .any(|child| self.contains_candidate(doc, *child))
    }

    /// The tracked surface an event target belongs to: the target itself or
    /// its nearest tracked ancestor (a keystroke in a rich composer targets
    /// a node deep inside it)
    pub fn surface_for(&self, doc: &Document, target: NodeId) -> Option<SurfaceHandle> {
        doc.self_and_ancestors(target)
            .find_map(|id| self.surfaces.get(&id).copied())
            .filter(|handle| doc.alive(handle.node))
    }

    /// Drop handles whose nodes have left the document. Their listeners died
    /// with the element; only the bookkeeping needs collecting.
    pub fn sweep(&mut self, doc: &Document) {
        self.surfaces.retain(|id, _| doc.alive(*id));
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
