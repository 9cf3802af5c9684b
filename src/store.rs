//! External configuration store collaborator
//!
//! The engine talks to the store through [`ConfigStore`]: load the full
//! config (possibly slow — the engine never blocks a keystroke on it),
//! record usage counters fire-and-forget, and answer the management UI's
//! statistics queries. [`FileStore`] is the on-disk implementation
//! (`abbreviations.json` + `usage.json`); [`MemoryStore`] backs tests.
//!
//! Statistics failures are swallowed here with a warning log: expansion
//! correctness never depends on a counter write succeeding.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::StoreConfig;

/// One aggregate usage counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub trigger: String,
    pub expansion: String,
    pub count: u64,
}

/// The external Configuration Store contract
pub trait ConfigStore {
    /// Fetch the full configuration. May be arbitrarily slow; callers cache
    /// the last good snapshot instead of calling this per keystroke.
    fn load(&self) -> Result<StoreConfig>;

    /// Fire-and-forget usage increment for a successful expansion
    fn record_usage(&self, trigger: &str, expansion: &str);

    /// Aggregate usage counters, highest count first
    fn usage_stats(&self) -> Vec<UsageEntry>;

    fn clear_stats(&self);
}

fn sorted_stats(usage: &HashMap<(String, String), u64>) -> Vec<UsageEntry> {
    let mut stats: Vec<UsageEntry> = usage
        .iter()
        .map(|((trigger, expansion), count)| UsageEntry {
            trigger: trigger.clone(),
            expansion: expansion.clone(),
            count: *count,
        })
        .collect();
    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.trigger.cmp(&b.trigger))
    });
    stats
}

// ----------------------------------------------------------------------
// FileStore
// ----------------------------------------------------------------------

/// JSON-file-backed store
pub struct FileStore {
    config_path: PathBuf,
    usage_path: Option<PathBuf>,
    usage: RefCell<HashMap<(String, String), u64>>,
}

impl FileStore {
    pub fn new(config_path: PathBuf, usage_path: Option<PathBuf>) -> Self {
        let usage = usage_path
            .as_ref()
            .map(|path| Self::load_usage(path))
            .unwrap_or_default();
        Self {
            config_path,
            usage_path,
            usage: RefCell::new(usage),
        }
    }

    fn load_usage(path: &PathBuf) -> HashMap<(String, String), u64> {
        if !path.exists() {
            return HashMap::new();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Vec<UsageEntry>>(&content) {
                Ok(entries) => entries
                    .into_iter()
                    .map(|e| ((e.trigger, e.expansion), e.count))
                    .collect(),
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                HashMap::new()
            }
        }
    }

    fn save_usage(&self) -> Result<()> {
        let Some(path) = &self.usage_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let stats = sorted_stats(&self.usage.borrow());
        let content = serde_json::to_string_pretty(&stats)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<StoreConfig> {
        let content = std::fs::read_to_string(&self.config_path)
            .with_context(|| format!("reading {}", self.config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.config_path.display()))
    }

    fn record_usage(&self, trigger: &str, expansion: &str) {
        *self
            .usage
            .borrow_mut()
            .entry((trigger.to_string(), expansion.to_string()))
            .or_insert(0) += 1;
        if let Err(e) = self.save_usage() {
            tracing::warn!("Failed to persist usage stats: {:#}", e);
        }
    }

    fn usage_stats(&self) -> Vec<UsageEntry> {
        sorted_stats(&self.usage.borrow())
    }

    fn clear_stats(&self) {
        self.usage.borrow_mut().clear();
        if let Err(e) = self.save_usage() {
            tracing::warn!("Failed to persist usage stats: {:#}", e);
        }
    }
}

// ----------------------------------------------------------------------
// MemoryStore
// ----------------------------------------------------------------------

/// In-memory store for tests and ad hoc hosts
#[derive(Default)]
pub struct MemoryStore {
    config: RefCell<StoreConfig>,
    usage: RefCell<HashMap<(String, String), u64>>,
}

impl MemoryStore {
    /// Replace the stored config (the management UI writing to the store)
    pub fn set_config(&self, config: StoreConfig) {
        *self.config.borrow_mut() = config;
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<StoreConfig> {
        Ok(self.config.borrow().clone())
    }

    fn record_usage(&self, trigger: &str, expansion: &str) {
        *self
            .usage
            .borrow_mut()
            .entry((trigger.to_string(), expansion.to_string()))
            .or_insert(0) += 1;
    }

    fn usage_stats(&self) -> Vec<UsageEntry> {
        sorted_stats(&self.usage.borrow())
    }

    fn clear_stats(&self) {
        self.usage.borrow_mut().clear();
    }
}
