//! Configuration snapshot: the abbreviation map plus engine settings
//!
//! The engine never reads the store directly on the keystroke path. It holds
//! an immutable [`ConfigSnapshot`] that is replaced wholesale whenever a
//! refresh arrives from the store — never patched in place, so a rewrite in
//! flight can never observe half of an old config and half of a new one.
//!
//! Until a first snapshot has been received the engine runs with
//! [`ConfigSnapshot::default`], which is empty and disabled: no expansions
//! fire on guessed defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-the-wire shape of the external configuration store
///
/// Field names match the store's JSON schema; flags default to "on, case
/// insensitive" when a file exists but omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Trigger string -> expansion template
    #[serde(default)]
    pub shortcuts: HashMap<String, String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, rename = "caseSensitive")]
    pub case_sensitive: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            shortcuts: HashMap::new(),
            enabled: true,
            case_sensitive: false,
        }
    }
}

/// Engine flags, refreshed wholesale together with the abbreviation map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub enabled: bool,
    pub case_sensitive: bool,
}

impl Default for EngineSettings {
    /// Disabled until a first snapshot arrives: configuration-unavailable
    /// behaves as `enabled=false`, not as guessed defaults
    fn default() -> Self {
        Self {
            enabled: false,
            case_sensitive: false,
        }
    }
}

/// Read-only trigger -> expansion-template map
///
/// Entries are held sorted longest-trigger-first (ties byte-lexicographic).
/// That order is the documented tie-break when several triggers match the
/// same typed word: the matcher takes the first hit in iteration order, so
/// the result is independent of insertion order.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationMap {
    entries: Vec<(String, String)>,
}

impl AbbreviationMap {
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut entries: Vec<(String, String)> = pairs.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        entries.dedup_by(|(a, _), (b, _)| a == b);
        Self { entries }
    }

    /// Entries in deterministic match order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, e)| (t.as_str(), e.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable configuration view used by the matcher and rewrite engine
#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    pub abbreviations: AbbreviationMap,
    pub settings: EngineSettings,
}

impl ConfigSnapshot {
    pub fn from_store(config: StoreConfig) -> Self {
        Self {
            abbreviations: AbbreviationMap::new(config.shortcuts),
            settings: EngineSettings {
                enabled: config.enabled,
                case_sensitive: config.case_sensitive,
            },
        }
    }
}
