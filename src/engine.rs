//! Rewrite engine: trigger detection, splice, caret placement
//!
//! The engine orchestrates matcher + variable resolver + surface adapter per
//! trigger event. Each event runs the same pipeline: policy gate, read
//! context, match the trailing word, resolve the template, splice text and
//! caret atomically, emit one synthetic change signal. No partial-success
//! state exists: either the full splice-plus-caret completes or nothing is
//! written and the user's text is untouched.
//!
//! Two trigger policies feed the pipeline:
//!
//! - **Boundary** ("endswith"): every content-change event on a flat surface
//!   is a candidate; the expansion fires as soon as the abbreviation is fully
//!   typed, no delimiter needed. Input bursts are debounced (~100 ms) and
//!   handled from [`Engine::tick`].
//! - **Trigger-key**: fires only on a space/tab/enter key-down, synchronously
//!   inside the key-down callback — the host must be told to suppress its
//!   default delimiter insertion before the event completes, so there is no
//!   debounce on this path. The delimiter is re-appended as a literal after
//!   the expansion.
//!
//! Some platforms visually revert a programmatic edit unless a send action
//! follows (the deferred-commit quirk). Site rules mark those; for them the
//! engine also stages a [`PendingExpansion`] so a silent revert can be
//! detected at blur time and the expansion re-applied once.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::config::{ConfigSnapshot, StoreConfig};
use crate::host::{Document, HostEvent, Key, Mutation, NodeId};
use crate::matcher::{match_abbreviation, MatchResult};
use crate::policy::SitePolicy;
use crate::registry::SurfaceRegistry;
use crate::store::{ConfigStore, UsageEntry};
use crate::surface::{self, SurfaceContext, SurfaceHandle, SurfaceKind};
use crate::template::{self, CURSOR_MARKER};
use crate::topology::TopologyWatcher;
use crate::util::{char_len, char_to_byte, Debounce};

/// Coalescing window for boundary-policy input handling
pub const INPUT_COALESCE_WINDOW: Duration = Duration::from_millis(100);

/// Delay before the post-send change signal is re-emitted, giving the
/// platform's own submit handler time to observe final content
pub const SEND_RESIGNAL_DELAY: Duration = Duration::from_millis(250);

/// What the host loop should do with the event it just delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not for us (untracked target, irrelevant event)
    Ignored,
    /// Consumed; default handling may proceed
    Handled,
    /// An expansion fired on key-down: the host must NOT insert the
    /// delimiter character itself (it was re-appended by the splice)
    SuppressDefault,
}

/// Staged expansion on a deferred-commit surface, waiting for the platform's
/// send action. Keyed by surface node; generation-checked ids mean entries
/// die with the surface instead of extending its lifetime.
#[derive(Debug, Clone)]
struct PendingExpansion {
    surface: SurfaceHandle,
    /// The text leaf that was rewritten
    leaf: NodeId,
    /// Leaf text before the expansion (what a silent revert restores)
    original_text: String,
    /// Leaf text after the expansion
    rewritten_text: String,
    #[allow(dead_code)]
    trigger_key: Key,
}

pub struct Engine {
    store: Rc<dyn ConfigStore>,
    policy: SitePolicy,
    registry: SurfaceRegistry,
    topology: TopologyWatcher,
    /// Current config. Replaced wholesale on refresh, never patched, so a
    /// single rewrite never straddles old and new config.
    snapshot: ConfigSnapshot,
    input_debounce: Debounce,
    /// Flat surfaces with input events inside the current coalescing window
    pending_inputs: Vec<SurfaceHandle>,
    pending_expansions: HashMap<NodeId, PendingExpansion>,
    delayed_signals: Vec<(Instant, SurfaceHandle)>,
}

impl Engine {
    pub fn new(store: Rc<dyn ConfigStore>, policy: SitePolicy, registry: SurfaceRegistry) -> Self {
        Self {
            store,
            policy,
            registry,
            topology: TopologyWatcher::default(),
            snapshot: ConfigSnapshot::default(),
            input_debounce: Debounce::new(INPUT_COALESCE_WINDOW),
            pending_inputs: Vec::new(),
            pending_expansions: HashMap::new(),
            delayed_signals: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Push a fresh configuration into the engine (wholesale replace)
    pub fn apply_config(&mut self, config: StoreConfig) {
        self.snapshot = ConfigSnapshot::from_store(config);
        tracing::info!(
            abbreviations = self.snapshot.abbreviations.len(),
            enabled = self.snapshot.settings.enabled,
            "config snapshot replaced"
        );
    }

    /// Force an immediate re-fetch from the store (management UI `reload`)
    pub fn reload(&mut self) -> anyhow::Result<()> {
        let config = self.store.load()?;
        self.apply_config(config);
        Ok(())
    }

    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    /// Statistics passthroughs for the management UI
    pub fn usage_stats(&self) -> Vec<UsageEntry> {
        self.store.usage_stats()
    }

    pub fn clear_stats(&self) {
        self.store.clear_stats();
    }

    // ------------------------------------------------------------------
    // Surface lifecycle
    // ------------------------------------------------------------------

    /// Initial full scan; later re-scans come from the topology watcher
    pub fn scan(&mut self, doc: &mut Document) {
        self.registry.scan(doc);
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    /// Deliver one host event. Key-down work happens synchronously here;
    /// input events only schedule debounced work for [`Engine::tick`].
    pub fn handle_event(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        event: HostEvent,
        now: Instant,
    ) -> EventOutcome {
        // A click on a send affordance can land outside any surface
        if event == HostEvent::Click {
            return self.handle_click(doc, target, now);
        }

        let Some(handle) = self.registry.surface_for(doc, target) else {
            return EventOutcome::Ignored;
        };

        match event {
            HostEvent::Input => self.handle_input(handle, now),
            HostEvent::KeyDown { key, shift } => self.handle_key_down(doc, handle, key, shift, now),
            HostEvent::Focus => {
                // A fresh edit cycle begins; staged expansion is obsolete
                self.pending_expansions.remove(&handle.node);
                EventOutcome::Handled
            }
            HostEvent::Blur => {
                self.handle_blur(doc, handle);
                EventOutcome::Handled
            }
            HostEvent::Click => unreachable!("handled above"),
        }
    }

    /// Boundary policy entry: coalesce, handle in tick
    fn handle_input(&mut self, handle: SurfaceHandle, now: Instant) -> EventOutcome {
        if handle.kind != SurfaceKind::Flat {
            return EventOutcome::Ignored;
        }
        if !self.pending_inputs.contains(&handle) {
            self.pending_inputs.push(handle);
        }
        self.input_debounce.schedule(now);
        EventOutcome::Handled
    }

    /// Trigger-key policy entry: synchronous, may suppress default insertion
    fn handle_key_down(
        &mut self,
        doc: &mut Document,
        handle: SurfaceHandle,
        key: Key,
        shift: bool,
        now: Instant,
    ) -> EventOutcome {
        // Enter-without-shift while an expansion is staged is the platform's
        // send action, not a delimiter
        if key == Key::Enter && !shift && self.pending_expansions.contains_key(&handle.node) {
            self.confirm_pending(doc, handle.node, now);
            return EventOutcome::Handled;
        }

        let Some(delimiter) = key.delimiter_char() else {
            return EventOutcome::Ignored;
        };

        if !self.policy.allows(doc, doc.origin(), handle.node) {
            return EventOutcome::Ignored;
        }

        let Some(ctx) = surface::read_context(doc, handle) else {
            return EventOutcome::Ignored;
        };
        let before_cursor = &ctx.full_text[..char_to_byte(&ctx.full_text, ctx.cursor_offset)];
        let Some(result) = match_abbreviation(
            before_cursor,
            self.snapshot.settings,
            &self.snapshot.abbreviations,
        ) else {
            return EventOutcome::Ignored;
        };

        let deferred = handle.kind == SurfaceKind::Structured
            && self
                .policy
                .rule(doc.origin())
                .map(|rule| rule.deferred_commit)
                .unwrap_or(false);

        let original_text = ctx.full_text.clone();
        let Some(rewritten) = self.rewrite(doc, handle, &ctx, &result, Some(delimiter)) else {
            return EventOutcome::Ignored;
        };

        if deferred {
            if let Some(caret) = doc.caret() {
                self.pending_expansions.insert(
                    handle.node,
                    PendingExpansion {
                        surface: handle,
                        leaf: caret.node,
                        original_text,
                        rewritten_text: rewritten,
                        trigger_key: key,
                    },
                );
            }
        }

        EventOutcome::SuppressDefault
    }

    fn handle_blur(&mut self, doc: &mut Document, handle: SurfaceHandle) {
        let Some(pending) = self.pending_expansions.remove(&handle.node) else {
            return;
        };
        // If the platform silently reverted the edit, apply it one more time
        if doc.leaf_text(pending.leaf) == Some(pending.original_text.as_str()) {
            tracing::debug!(surface = ?handle.node, "platform reverted expansion; re-applying");
            doc.set_leaf_text(pending.leaf, &pending.rewritten_text);
            surface::dispatch_change(doc, pending.surface);
        }
    }

    fn handle_click(&mut self, doc: &mut Document, target: NodeId, now: Instant) -> EventOutcome {
        let is_send = self
            .policy
            .rule(doc.origin())
            .map(|rule| {
                rule.send
                    .iter()
                    .any(|sel| sel.matches_with_ancestors(doc, target))
            })
            .unwrap_or(false);
        if !is_send || self.pending_expansions.is_empty() {
            return EventOutcome::Ignored;
        }
        let nodes: Vec<NodeId> = self.pending_expansions.keys().copied().collect();
        for node in nodes {
            self.confirm_pending(doc, node, now);
        }
        EventOutcome::Handled
    }

    /// Send action observed: drop the staged record, make sure the expanded
    /// text is in place, and re-emit the change signal after a short delay so
    /// the platform's own submit handler sees final content
    fn confirm_pending(&mut self, doc: &mut Document, node: NodeId, now: Instant) {
        let Some(pending) = self.pending_expansions.remove(&node) else {
            return;
        };
        if doc.leaf_text(pending.leaf) == Some(pending.original_text.as_str()) {
            doc.set_leaf_text(pending.leaf, &pending.rewritten_text);
        }
        self.delayed_signals
            .push((now + SEND_RESIGNAL_DELAY, pending.surface));
    }

    // ------------------------------------------------------------------
    // Deferred work
    // ------------------------------------------------------------------

    /// Run everything whose debounce window or delay has elapsed. The host
    /// loop calls this regularly with its notion of "now".
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        let mutations = doc.drain_mutations();
        if !mutations.is_empty() {
            if mutations.iter().any(|m| matches!(m, Mutation::Removed(_))) {
                // Destroyed surfaces drop out immediately; their listeners
                // died with the element
                self.registry.sweep(doc);
                self.pending_expansions.retain(|id, _| doc.alive(*id));
                self.pending_inputs.retain(|h| doc.alive(h.node));
            }
            self.topology.observe(doc, &self.registry, &mutations, now);
        }
        if self.topology.rescan_due(now) {
            let newly = self.registry.scan(doc);
            if !newly.is_empty() {
                tracing::debug!(count = newly.len(), "topology re-scan tracked new surfaces");
            }
        }

        if self.input_debounce.fire_due(now) {
            let surfaces = std::mem::take(&mut self.pending_inputs);
            for handle in surfaces {
                self.expand_boundary(doc, handle);
            }
        }

        let mut due = Vec::new();
        self.delayed_signals.retain(|(deadline, handle)| {
            if now >= *deadline {
                due.push(*handle);
                false
            } else {
                true
            }
        });
        for handle in due {
            if doc.alive(handle.node) {
                surface::dispatch_change(doc, handle);
            }
        }
    }

    /// Boundary-policy match pass for one flat surface
    fn expand_boundary(&mut self, doc: &mut Document, handle: SurfaceHandle) {
        if !doc.alive(handle.node) {
            return;
        }
        if !self.policy.allows(doc, doc.origin(), handle.node) {
            return;
        }
        let Some(ctx) = surface::read_context(doc, handle) else {
            return;
        };
        let before_cursor = &ctx.full_text[..char_to_byte(&ctx.full_text, ctx.cursor_offset)];
        let Some(result) = match_abbreviation(
            before_cursor,
            self.snapshot.settings,
            &self.snapshot.abbreviations,
        ) else {
            return;
        };
        self.rewrite(doc, handle, &ctx, &result, None);
    }

    // ------------------------------------------------------------------
    // The splice
    // ------------------------------------------------------------------

    /// Splice the resolved expansion over the matched trigger word and place
    /// the caret. Returns the final surface text on success, `None` if the
    /// surface could not be written (in which case nothing was touched).
    fn rewrite(
        &mut self,
        doc: &mut Document,
        handle: SurfaceHandle,
        ctx: &SurfaceContext,
        result: &MatchResult,
        delimiter: Option<char>,
    ) -> Option<String> {
        // B = text before the matched word, A = text after the cursor
        let typed_len = char_len(&result.typed);
        let b_chars = ctx.cursor_offset - typed_len;
        let before = &ctx.full_text[..char_to_byte(&ctx.full_text, b_chars)];
        let after = &ctx.full_text[char_to_byte(&ctx.full_text, ctx.cursor_offset)..];

        let resolved = template::resolve(&result.template, Local::now());

        // Caret target: the {cursor} marker if present, else end of expansion
        // (plus the delimiter when one is re-appended)
        let (expansion, caret) = match resolved.find(CURSOR_MARKER) {
            Some(marker_byte) => {
                let marker_chars = char_len(&resolved[..marker_byte]);
                (
                    resolved.replace(CURSOR_MARKER, ""),
                    b_chars + marker_chars,
                )
            }
            None => {
                let caret =
                    b_chars + char_len(&resolved) + if delimiter.is_some() { 1 } else { 0 };
                (resolved, caret)
            }
        };

        let mut final_text =
            String::with_capacity(before.len() + expansion.len() + after.len() + 1);
        final_text.push_str(before);
        final_text.push_str(&expansion);
        if let Some(d) = delimiter {
            final_text.push(d);
        }
        final_text.push_str(after);

        // Text and caret land together, then the host page is notified once
        if !surface::write(doc, handle, &final_text, caret) {
            return None;
        }
        surface::dispatch_change(doc, handle);

        tracing::debug!(
            trigger = %result.trigger,
            surface = ?handle.node,
            "expanded abbreviation"
        );
        // Fire-and-forget: a failed counter write never undoes the rewrite
        self.store.record_usage(&result.trigger, &result.template);

        Some(final_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashMap as Map;

    fn engine_with(shortcuts: &[(&str, &str)]) -> Engine {
        let store = Rc::new(MemoryStore::default());
        let mut engine = Engine::new(store, SitePolicy::default(), SurfaceRegistry::default());
        let mut map = Map::new();
        for (t, e) in shortcuts {
            map.insert(t.to_string(), e.to_string());
        }
        engine.apply_config(StoreConfig {
            shortcuts: map,
            enabled: true,
            case_sensitive: false,
        });
        engine
    }

    #[test]
    fn no_snapshot_means_no_expansion() {
        let store = Rc::new(MemoryStore::default());
        let mut engine = Engine::new(store, SitePolicy::default(), SurfaceRegistry::default());

        let mut doc = Document::new("example.com");
        let input = doc.create_input("text");
        doc.append(doc.root(), input);
        engine.scan(&mut doc);
        doc.flat_state_mut(input).unwrap().set("ty", 2);

        let now = Instant::now();
        engine.handle_event(&mut doc, input, HostEvent::Input, now);
        engine.tick(&mut doc, now + INPUT_COALESCE_WINDOW);

        assert_eq!(doc.flat_state(input).unwrap().text(), "ty");
    }

    #[test]
    fn reload_pulls_fresh_config_from_store() {
        let store = Rc::new(MemoryStore::default());
        let mut engine =
            Engine::new(store.clone(), SitePolicy::default(), SurfaceRegistry::default());
        assert!(!engine.snapshot().settings.enabled);

        let mut shortcuts = Map::new();
        shortcuts.insert("ty".to_string(), "Thank you".to_string());
        store.set_config(StoreConfig {
            shortcuts,
            enabled: true,
            case_sensitive: true,
        });

        engine.reload().unwrap();
        assert!(engine.snapshot().settings.enabled);
        assert!(engine.snapshot().settings.case_sensitive);
        assert_eq!(engine.snapshot().abbreviations.len(), 1);
    }

    #[test]
    fn boundary_expansion_rewrites_trigger_in_place() {
        // config {"/ty": "Thank you"}, value "ok /ty", caret at end
        let mut engine = engine_with(&[("/ty", "Thank you")]);
        let mut doc = Document::new("example.com");
        let input = doc.create_input("text");
        doc.append(doc.root(), input);
        engine.scan(&mut doc);
        doc.flat_state_mut(input).unwrap().set("ok /ty", 6);

        let now = Instant::now();
        engine.handle_event(&mut doc, input, HostEvent::Input, now);
        engine.tick(&mut doc, now + INPUT_COALESCE_WINDOW);

        let state = doc.flat_state(input).unwrap();
        assert_eq!(state.text(), "ok Thank you");
        assert_eq!(state.selection_start, 12);
    }
}
