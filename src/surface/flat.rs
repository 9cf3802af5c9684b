//! Flat adapter: value + linear selection offset (input, textarea)

use crate::host::{Document, NodeId};
use crate::util::char_len;

use super::SurfaceContext;

pub(super) fn read_context(doc: &Document, node: NodeId) -> Option<SurfaceContext> {
    let state = doc.flat_state(node)?;
    let full_text = state.text();
    let cursor_offset = state.selection_start;
    if cursor_offset > char_len(&full_text) {
        // Selection out of sync with the value; skip rather than guess
        return None;
    }
    Some(SurfaceContext {
        full_text,
        cursor_offset,
    })
}

/// Replace the whole value and collapse the selection (start == end) at the
/// given offset
pub(super) fn write(doc: &mut Document, node: NodeId, text: &str, cursor_offset: usize) -> bool {
    match doc.flat_state_mut(node) {
        Some(state) => {
            state.set(text, cursor_offset);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::host::Document;
    use crate::surface::{self, SurfaceHandle, SurfaceKind};

    fn flat_doc(text: &str, caret: usize) -> (Document, SurfaceHandle) {
        let mut doc = Document::new("example.com");
        let input = doc.create_input("text");
        doc.append(doc.root(), input);
        let state = doc.flat_state_mut(input).unwrap();
        state.set(text, caret);
        (
            doc,
            SurfaceHandle {
                node: input,
                kind: SurfaceKind::Flat,
            },
        )
    }

    #[test]
    fn reads_value_and_selection_start() {
        let (doc, handle) = flat_doc("hello world", 5);
        let ctx = surface::read_context(&doc, handle).unwrap();
        assert_eq!(ctx.full_text, "hello world");
        assert_eq!(ctx.cursor_offset, 5);
    }

    #[test]
    fn write_replaces_value_and_collapses_caret() {
        let (mut doc, handle) = flat_doc("hello", 5);
        assert!(surface::write(&mut doc, handle, "goodbye", 3));
        let state = doc.flat_state(handle.node).unwrap();
        assert_eq!(state.text(), "goodbye");
        assert_eq!(state.selection_start, 3);
        assert_eq!(state.selection_end, 3);
    }

    #[test]
    fn dead_node_reads_and_writes_nothing() {
        let (mut doc, handle) = flat_doc("hello", 0);
        doc.remove(handle.node);
        assert!(surface::read_context(&doc, handle).is_none());
        assert!(!surface::write(&mut doc, handle, "x", 0));
    }
}
