//! Per-site allow/deny rules
//!
//! Site behavior is table-driven: a YAML file maps hostnames to rules, and
//! the rules are the only extension point for site differences. The engine
//! itself never names a platform.
//!
//! Rule semantics (checked before the matcher ever runs):
//! - default allow: no rule for the hostname means every surface is fair game
//! - `exclude`: deny when the element or an ancestor matches any entry, even
//!   if an include entry also matches
//! - `include`: when non-empty this is an allow-list — ONLY elements matching
//!   an entry (self or ancestor) are allowed, everything else is denied
//! - `deferred_commit` + `send`: marks surfaces whose programmatic edits the
//!   platform reverts unless confirmed by a send action; `send` lists the
//!   selectors recognized as that platform's send affordance

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::host::{Document, NodeId, Selector};

/// Rules for one hostname
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteRule {
    #[serde(default)]
    pub include: Vec<Selector>,
    #[serde(default)]
    pub exclude: Vec<Selector>,
    #[serde(default)]
    pub deferred_commit: bool,
    #[serde(default)]
    pub send: Vec<Selector>,
}

/// Full contents of `sites.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitesConfig {
    /// Extra selector patterns treated as editable composers when scanning,
    /// on top of the built-in editable criteria
    #[serde(default)]
    pub composers: Vec<Selector>,
    #[serde(default)]
    pub sites: HashMap<String, SiteRule>,
}

/// Per-origin policy consulted before any match attempt
#[derive(Debug, Clone, Default)]
pub struct SitePolicy {
    sites: HashMap<String, SiteRule>,
}

impl SitePolicy {
    pub fn new(sites: HashMap<String, SiteRule>) -> Self {
        Self { sites }
    }

    /// Parse a `sites.yaml` document into (policy, composer patterns)
    pub fn from_yaml(yaml: &str) -> Result<(Self, Vec<Selector>)> {
        let config: SitesConfig = serde_yaml::from_str(yaml).context("parsing sites.yaml")?;
        Ok((Self::new(config.sites), config.composers))
    }

    /// Load from disk; a missing file is an empty (allow-everything) policy
    pub fn load(path: Option<&Path>) -> (Self, Vec<Selector>) {
        let Some(path) = path else {
            return (Self::default(), Vec::new());
        };
        if !path.exists() {
            tracing::debug!("No site rules at {}, allowing everywhere", path.display());
            return (Self::default(), Vec::new());
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(loaded) => loaded,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    (Self::default(), Vec::new())
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                (Self::default(), Vec::new())
            }
        }
    }

    pub fn rule(&self, hostname: &str) -> Option<&SiteRule> {
        self.sites.get(hostname)
    }

    /// May the engine attempt expansions on this element?
    pub fn allows(&self, doc: &Document, hostname: &str, node: NodeId) -> bool {
        let Some(rule) = self.rule(hostname) else {
            return true;
        };

        if !rule.include.is_empty()
            && !rule
                .include
                .iter()
                .any(|sel| sel.matches_with_ancestors(doc, node))
        {
            return false;
        }

        !rule
            .exclude
            .iter()
            .any(|sel| sel.matches_with_ancestors(doc, node))
    }
}
