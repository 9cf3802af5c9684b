//! Node types for the host document arena

use ropey::Rope;
use std::collections::HashMap;

/// Generation-checked handle into a [`Document`](super::Document) arena.
///
/// The generation makes stale handles detectable: once a node is removed its
/// slot's generation is bumped, and every `NodeId` minted before then stops
/// resolving. Side tables keyed by `NodeId` therefore never extend a node's
/// lifetime and never observe a recycled slot as the old node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Value + linear selection of a flat editable surface (input/textarea)
#[derive(Debug, Clone)]
pub struct FlatState {
    /// The surface value. Rope keeps multi-line textarea edits cheap.
    pub value: Rope,
    /// Selection start, in characters
    pub selection_start: usize,
    /// Selection end, in characters (== start for a collapsed caret)
    pub selection_end: usize,
}

impl FlatState {
    pub fn from_text(text: &str) -> Self {
        let value = Rope::from_str(text);
        let end = value.len_chars();
        Self {
            value,
            selection_start: end,
            selection_end: end,
        }
    }

    pub fn text(&self) -> String {
        self.value.to_string()
    }

    /// Replace the whole value and collapse the selection at `caret`
    pub fn set(&mut self, text: &str, caret: usize) {
        self.value = Rope::from_str(text);
        let caret = caret.min(self.value.len_chars());
        self.selection_start = caret;
        self.selection_end = caret;
    }
}

/// What kind of node this is
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A plain element (possibly contenteditable via attribute)
    Element,
    /// A text-bearing leaf inside a structured editable region
    TextLeaf { text: String },
    /// `<input type=...>` with a flat value + selection
    Input {
        input_type: String,
        state: FlatState,
    },
    /// `<textarea>` with a flat value + selection
    TextArea { state: FlatState },
    /// Shadow root boundary; children live in the shadow tree
    ShadowRoot,
    /// Frame boundary. Children are the framed document's content; `origin`
    /// decides whether a scan may descend.
    Frame { origin: String },
}

/// One node in the host tree
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub kind: NodeKind,
    pub attrs: HashMap<String, String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Listener-attached marker, recorded on the element itself so it
    /// survives registry re-scans (idempotent tracking)
    pub tracked: bool,
}

impl Node {
    pub(crate) fn new(tag: &str, kind: NodeKind) -> Self {
        Self {
            tag: tag.to_string(),
            kind,
            attrs: HashMap::new(),
            children: Vec::new(),
            parent: None,
            tracked: false,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|part| part == class))
            .unwrap_or(false)
    }

    /// Explicitly marked editable (`contenteditable` absent-value or "true")
    pub fn is_content_editable(&self) -> bool {
        matches!(self.attr("contenteditable"), Some("" | "true"))
    }
}

/// Caret position inside a structured editable region: a node plus a
/// character offset within it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub node: NodeId,
    pub offset: usize,
}
