//! Host document: generation-checked node arena plus the engine-facing
//! journals (structural mutations in, synthetic events out)

use super::node::{Caret, FlatState, Node, NodeId, NodeKind};

/// A structural mutation observed on the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Node (and its subtree) was attached
    Added(NodeId),
    /// Node (and its subtree) was detached
    Removed(NodeId),
}

/// Programmatic event the engine emits back at the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticEvent {
    /// "Content changed" signal for a surface, as if the user had typed
    Change(NodeId),
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The host page: one arena for the whole tree, frames included
///
/// `origin` is the top-level document's origin; frame nodes carry their own.
/// Structural edits are journaled into `mutations` for the topology watcher;
/// engine-emitted change signals land in the `outbox` for the host loop.
#[derive(Debug)]
pub struct Document {
    origin: String,
    slots: Vec<Slot>,
    root: NodeId,
    caret: Option<Caret>,
    focused: Option<NodeId>,
    mutations: Vec<Mutation>,
    outbox: Vec<SyntheticEvent>,
}

impl Document {
    /// Create a document with an empty `body` root element
    pub fn new(origin: &str) -> Self {
        let mut doc = Self {
            origin: origin.to_string(),
            slots: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            caret: None,
            focused: None,
            mutations: Vec::new(),
            outbox: Vec::new(),
        };
        doc.root = doc.alloc(Node::new("body", NodeKind::Element));
        // The root is not a mutation anyone needs to observe
        doc.mutations.clear();
        doc
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    fn alloc(&mut self, node: Node) -> NodeId {
        // Reuse the first free slot, else grow
        if let Some(index) = self.slots.iter().position(|slot| slot.node.is_none()) {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return NodeId {
                index: index as u32,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::new(tag, NodeKind::Element))
    }

    pub fn create_input(&mut self, input_type: &str) -> NodeId {
        self.alloc(Node::new(
            "input",
            NodeKind::Input {
                input_type: input_type.to_string(),
                state: FlatState::from_text(""),
            },
        ))
    }

    pub fn create_textarea(&mut self) -> NodeId {
        self.alloc(Node::new(
            "textarea",
            NodeKind::TextArea {
                state: FlatState::from_text(""),
            },
        ))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Node::new(
            "#text",
            NodeKind::TextLeaf {
                text: text.to_string(),
            },
        ))
    }

    pub fn create_shadow_root(&mut self) -> NodeId {
        self.alloc(Node::new("#shadow-root", NodeKind::ShadowRoot))
    }

    pub fn create_frame(&mut self, origin: &str) -> NodeId {
        self.alloc(Node::new(
            "iframe",
            NodeKind::Frame {
                origin: origin.to_string(),
            },
        ))
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    /// Attach `child` under `parent` and journal the addition
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.alive(parent) || !self.alive(child) {
            return;
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        self.mutations.push(Mutation::Added(child));
    }

    /// Detach `id` and retire its whole subtree. Handles into the subtree go
    /// stale (generation bump), so side tables keyed by them die with it.
    pub fn remove(&mut self, id: NodeId) {
        if !self.alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent) {
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.children.retain(|c| *c != id);
            }
        }
        self.retire_subtree(id);
        self.mutations.push(Mutation::Removed(id));
        if self.caret.map(|c| !self.alive(c.node)).unwrap_or(false) {
            self.caret = None;
        }
        if self.focused.map(|f| !self.alive(f)).unwrap_or(false) {
            self.focused = None;
        }
    }

    fn retire_subtree(&mut self, id: NodeId) {
        let children = self
            .node(id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.retire_subtree(child);
        }
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
    }

    /// Whether `id` still resolves (slot occupied, generation matches)
    pub fn alive(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index as usize)
            .map(|slot| slot.generation == id.generation && slot.node.is_some())
            .unwrap_or(false)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Walk from `id` towards the root (exclusive of `id` itself)
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.node(id).and_then(|n| n.parent);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.node(next).and_then(|n| n.parent);
            Some(next)
        })
    }

    /// `id` plus its ancestors, nearest first
    pub fn self_and_ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(id).chain(self.ancestors(id))
    }

    // ------------------------------------------------------------------
    // Caret and focus
    // ------------------------------------------------------------------

    pub fn caret(&self) -> Option<Caret> {
        self.caret.filter(|c| self.alive(c.node))
    }

    pub fn set_caret(&mut self, caret: Option<Caret>) {
        self.caret = caret;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|f| self.alive(*f))
    }

    pub fn set_focused(&mut self, id: Option<NodeId>) {
        self.focused = id;
    }

    // ------------------------------------------------------------------
    // Text access
    // ------------------------------------------------------------------

    /// Text of a text leaf, if `id` is one
    pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::TextLeaf { text } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn set_leaf_text(&mut self, id: NodeId, new_text: &str) {
        if let Some(node) = self.node_mut(id) {
            if let NodeKind::TextLeaf { text } = &mut node.kind {
                *text = new_text.to_string();
            }
        }
    }

    /// Flat value + selection of an input/textarea, if `id` is one
    pub fn flat_state(&self, id: NodeId) -> Option<&FlatState> {
        match &self.node(id)?.kind {
            NodeKind::Input { state, .. } | NodeKind::TextArea { state } => Some(state),
            _ => None,
        }
    }

    pub fn flat_state_mut(&mut self, id: NodeId) -> Option<&mut FlatState> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Input { state, .. } | NodeKind::TextArea { state } => Some(state),
            _ => None,
        }
    }

    /// Concatenated text of every text leaf under `id` (structured surfaces)
    pub fn subtree_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        if let NodeKind::TextLeaf { text } = &node.kind {
            out.push_str(text);
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    // ------------------------------------------------------------------
    // Journals
    // ------------------------------------------------------------------

    /// Drain the structural-mutation journal (topology watcher input)
    pub fn drain_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    pub fn emit(&mut self, event: SyntheticEvent) {
        self.outbox.push(event);
    }

    /// Drain engine-emitted synthetic events (host page output)
    pub fn drain_outbox(&mut self) -> Vec<SyntheticEvent> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_node_ids_go_stale() {
        let mut doc = Document::new("example.com");
        let div = doc.create_element("div");
        let leaf = doc.create_text("hi");
        doc.append(doc.root(), div);
        doc.append(div, leaf);

        assert!(doc.alive(leaf));
        doc.remove(div);
        assert!(!doc.alive(div));
        assert!(!doc.alive(leaf));
        assert!(doc.node(leaf).is_none());
    }

    #[test]
    fn slot_reuse_does_not_resurrect_old_handles() {
        let mut doc = Document::new("example.com");
        let div = doc.create_element("div");
        doc.append(doc.root(), div);
        doc.remove(div);

        let replacement = doc.create_element("span");
        doc.append(doc.root(), replacement);
        // Slot is recycled but the old handle's generation no longer matches
        assert!(!doc.alive(div));
        assert!(doc.alive(replacement));
    }

    #[test]
    fn caret_cleared_when_its_node_is_removed() {
        let mut doc = Document::new("example.com");
        let editor = doc.create_element("div");
        let leaf = doc.create_text("hello");
        doc.append(doc.root(), editor);
        doc.append(editor, leaf);
        doc.set_caret(Some(Caret {
            node: leaf,
            offset: 3,
        }));

        doc.remove(editor);
        assert!(doc.caret().is_none());
    }

    #[test]
    fn mutation_journal_records_adds_and_removes() {
        let mut doc = Document::new("example.com");
        let input = doc.create_input("text");
        doc.append(doc.root(), input);
        doc.remove(input);

        let journal = doc.drain_mutations();
        assert_eq!(
            journal,
            vec![Mutation::Added(input), Mutation::Removed(input)]
        );
        assert!(doc.drain_mutations().is_empty());
    }

    #[test]
    fn subtree_text_concatenates_leaves() {
        let mut doc = Document::new("example.com");
        let editor = doc.create_element("div");
        let a = doc.create_text("hello ");
        let b = doc.create_element("b");
        let c = doc.create_text("world");
        doc.append(doc.root(), editor);
        doc.append(editor, a);
        doc.append(editor, b);
        doc.append(b, c);

        assert_eq!(doc.subtree_text(editor), "hello world");
    }
}
