//! Miniature host document model
//!
//! The engine does not run inside a browser; it runs against this in-process
//! stand-in for one. The model covers exactly what the engine needs from a
//! host page and nothing more:
//!
//! - [`Document`]: a generation-checked node arena with a caret, a focus
//!   slot, a structural-mutation journal, and a synthetic-event outbox
//! - [`Node`] / [`NodeKind`]: elements, text leaves, flat-value inputs and
//!   textareas, shadow roots, and (same- or cross-origin) frames
//! - [`Selector`]: the small selector language used by site policy rules and
//!   composer patterns (`tag`, `#id`, `.class`, `[attr]`, `[attr=value]`)
//! - [`HostEvent`] / [`Key`]: the event stream a host loop feeds the engine
//!
//! Frames share the root document's arena; a frame node carries its own
//! origin, and tree walks decide whether to descend. Removing a node retires
//! its whole subtree's generations, so stale [`NodeId`]s held elsewhere
//! (pending expansions, registry handles) go dead instead of dangling.

mod document;
mod events;
mod node;
mod selector;

pub use document::{Document, Mutation, SyntheticEvent};
pub use events::{HostEvent, Key};
pub use node::{Caret, FlatState, Node, NodeId, NodeKind};
pub use selector::Selector;
