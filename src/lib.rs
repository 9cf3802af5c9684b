//! expando - abbreviation expansion engine
//!
//! This crate provides the matching-and-rewrite core of a text expander:
//! track the editable surfaces of a host page, watch what the user types,
//! and splice configured expansions (with variable substitution and cursor
//! placement) over the abbreviations they stand for.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod config_watcher;
pub mod engine;
pub mod host;
pub mod matcher;
pub mod policy;
pub mod registry;
pub mod store;
pub mod surface;
pub mod template;
pub mod topology;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigSnapshot, EngineSettings, StoreConfig};
pub use engine::{Engine, EventOutcome};
pub use host::{Document, HostEvent, Key};
pub use policy::SitePolicy;
pub use registry::SurfaceRegistry;
pub use store::{ConfigStore, FileStore, MemoryStore};
pub use surface::{SurfaceHandle, SurfaceKind};
