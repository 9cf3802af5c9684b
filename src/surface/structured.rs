//! Structured adapter: caret-in-text-leaf (contenteditable, rich composers)
//!
//! Operates on the single text leaf that currently holds the caret, scoped
//! to that one leaf rather than the whole region. A trigger word split
//! across two leaves is therefore not recognized; that is a documented
//! limitation of the addressing model, not something to "fix" by merging
//! leaves behind the host page's back.

use crate::host::{Caret, Document, NodeId};
use crate::util::char_len;

use super::SurfaceContext;

/// The text leaf the caret currently sits in, provided it lies inside the
/// surface rooted at `root`. Anything else is "no context": never guess a
/// different node.
fn caret_leaf(doc: &Document, root: NodeId) -> Option<Caret> {
    let caret = doc.caret()?;
    doc.leaf_text(caret.node)?;
    if !doc.self_and_ancestors(caret.node).any(|n| n == root) {
        return None;
    }
    Some(caret)
}

pub(super) fn read_context(doc: &Document, root: NodeId) -> Option<SurfaceContext> {
    let caret = caret_leaf(doc, root)?;
    let full_text = doc.leaf_text(caret.node)?.to_string();
    if caret.offset > char_len(&full_text) {
        return None;
    }
    Some(SurfaceContext {
        full_text,
        cursor_offset: caret.offset,
    })
}

/// Replace the caret leaf's text and collapse the caret at `cursor_offset`
/// within it
pub(super) fn write(doc: &mut Document, root: NodeId, text: &str, cursor_offset: usize) -> bool {
    let Some(caret) = caret_leaf(doc, root) else {
        return false;
    };
    doc.set_leaf_text(caret.node, text);
    doc.set_caret(Some(Caret {
        node: caret.node,
        offset: cursor_offset.min(char_len(text)),
    }));
    true
}
