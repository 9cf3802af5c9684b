//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use expando::engine::{Engine, INPUT_COALESCE_WINDOW};
use expando::host::{Caret, Document, HostEvent, Key, NodeId};
use expando::{MemoryStore, SitePolicy, StoreConfig, SurfaceRegistry};

/// Build a store config from trigger/template pairs
pub fn store_config(shortcuts: &[(&str, &str)]) -> StoreConfig {
    let map: HashMap<String, String> = shortcuts
        .iter()
        .map(|(t, e)| (t.to_string(), e.to_string()))
        .collect();
    StoreConfig {
        shortcuts: map,
        enabled: true,
        case_sensitive: false,
    }
}

/// Engine wired to a fresh MemoryStore, default policy, given shortcuts
pub fn test_engine(shortcuts: &[(&str, &str)]) -> (Engine, Rc<MemoryStore>) {
    test_engine_with_policy(shortcuts, SitePolicy::default())
}

pub fn test_engine_with_policy(
    shortcuts: &[(&str, &str)],
    policy: SitePolicy,
) -> (Engine, Rc<MemoryStore>) {
    let store = Rc::new(MemoryStore::default());
    let mut engine = Engine::new(store.clone(), policy, SurfaceRegistry::default());
    engine.apply_config(store_config(shortcuts));
    (engine, store)
}

/// Document with a single tracked text input holding `text` with the caret
/// at `caret`
pub fn flat_doc(engine: &mut Engine, text: &str, caret: usize) -> (Document, NodeId) {
    let mut doc = Document::new("example.com");
    let input = doc.create_input("text");
    doc.append(doc.root(), input);
    engine.scan(&mut doc);
    doc.flat_state_mut(input).unwrap().set(text, caret);
    (doc, input)
}

/// Document with a tracked contenteditable editor containing one text leaf,
/// caret inside the leaf
pub fn structured_doc(
    engine: &mut Engine,
    text: &str,
    caret_offset: usize,
) -> (Document, NodeId, NodeId) {
    let mut doc = Document::new("example.com");
    let editor = doc.create_element("div");
    doc.node_mut(editor)
        .unwrap()
        .attrs
        .insert("contenteditable".to_string(), "true".to_string());
    let leaf = doc.create_text(text);
    doc.append(doc.root(), editor);
    doc.append(editor, leaf);
    doc.set_caret(Some(Caret {
        node: leaf,
        offset: caret_offset,
    }));
    engine.scan(&mut doc);
    (doc, editor, leaf)
}

/// Deliver an input event and tick past the coalescing window
pub fn fire_input(engine: &mut Engine, doc: &mut Document, target: NodeId) {
    let now = Instant::now();
    engine.handle_event(doc, target, HostEvent::Input, now);
    engine.tick(doc, now + INPUT_COALESCE_WINDOW);
}

/// Deliver a key-down event (no tick; trigger-key runs synchronously)
pub fn fire_key(
    engine: &mut Engine,
    doc: &mut Document,
    target: NodeId,
    key: Key,
) -> expando::EventOutcome {
    engine.handle_event(doc, target, HostEvent::KeyDown { key, shift: false }, Instant::now())
}

/// Tick far enough ahead that every pending deadline fires
pub fn settle(engine: &mut Engine, doc: &mut Document) {
    engine.tick(doc, Instant::now() + Duration::from_secs(5));
}

/// Flat surface value and caret
pub fn flat_value(doc: &Document, input: NodeId) -> (String, usize) {
    let state = doc.flat_state(input).unwrap();
    (state.text(), state.selection_start)
}
