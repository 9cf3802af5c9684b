//! Surface adapters: one read/write/caret contract over two editable models
//!
//! Editable surfaces come in two incompatible shapes. Inputs and textareas
//! are a flat value plus a linear selection offset; contenteditable regions
//! are a tree addressed through a caret sitting inside a text leaf. The
//! engine never branches on that difference: it sees
//! [`read_context`] / [`write`] / [`dispatch_change`] and a
//! [`SurfaceKind`] tag chosen once when the surface is registered, never
//! re-inspected per keystroke.
//!
//! Failure semantics are fail-safe throughout: any unusable state (dead
//! node, no caret, caret outside a text leaf, out-of-range offset) reads as
//! "no context" and the expansion silently does not fire. An adapter never
//! guesses a different node and never corrupts user text on error.

mod flat;
mod structured;

use crate::host::{Document, NodeId, SyntheticEvent};

/// Which text-representation model a surface uses. Decided once at
/// registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Value + linear selection (input, textarea)
    Flat,
    /// Caret-in-text-leaf (contenteditable, rich composers)
    Structured,
}

/// One tracked editable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle {
    pub node: NodeId,
    pub kind: SurfaceKind,
}

/// What the engine scans for a trigger: the text before and around the
/// cursor, scoped to the adapter's addressable unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceContext {
    /// Full text of the addressable unit (whole value for flat surfaces,
    /// one text leaf for structured ones)
    pub full_text: String,
    /// Caret position within `full_text`, in characters
    pub cursor_offset: usize,
}

/// Read the current text context of a surface, or `None` if the surface is
/// in no state to be read
pub fn read_context(doc: &Document, handle: SurfaceHandle) -> Option<SurfaceContext> {
    match handle.kind {
        SurfaceKind::Flat => flat::read_context(doc, handle.node),
        SurfaceKind::Structured => structured::read_context(doc, handle.node),
    }
}

/// Replace the surface's addressable text and collapse the caret at
/// `cursor_offset`, atomically. Returns false (writing nothing) if the
/// surface can no longer be addressed.
pub fn write(doc: &mut Document, handle: SurfaceHandle, text: &str, cursor_offset: usize) -> bool {
    match handle.kind {
        SurfaceKind::Flat => flat::write(doc, handle.node, text, cursor_offset),
        SurfaceKind::Structured => structured::write(doc, handle.node, text, cursor_offset),
    }
}

/// Emit the synthetic "content changed" signal for this surface so host-page
/// logic observes the programmatic edit as if the user had typed it
pub fn dispatch_change(doc: &mut Document, handle: SurfaceHandle) {
    doc.emit(SyntheticEvent::Change(handle.node));
}
