//! File-backed store: config loading, defaults, usage counters

mod common;

use std::fs;
use std::rc::Rc;

use expando::store::ConfigStore;
use expando::{Engine, FileStore, SitePolicy, SurfaceRegistry};

#[test]
fn loads_shortcuts_and_flags_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abbreviations.json");
    fs::write(
        &path,
        r#"{"shortcuts": {"ty": "Thank you", "sig": "Best,\n{cursor}\nName"},
           "enabled": true, "caseSensitive": true}"#,
    )
    .unwrap();

    let store = FileStore::new(path, None);
    let config = store.load().unwrap();
    assert_eq!(config.shortcuts.len(), 2);
    assert!(config.case_sensitive);
}

#[test]
fn missing_flags_default_to_enabled_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abbreviations.json");
    fs::write(&path, r#"{"shortcuts": {"ty": "Thank you"}}"#).unwrap();

    let config = FileStore::new(path, None).load().unwrap();
    assert!(config.enabled);
    assert!(!config.case_sensitive);
}

#[test]
fn missing_file_is_an_error_and_engine_stays_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let store = Rc::new(FileStore::new(dir.path().join("nope.json"), None));
    let mut engine = Engine::new(store, SitePolicy::default(), SurfaceRegistry::default());

    assert!(engine.reload().is_err());
    // Never received a snapshot: behaves as enabled=false
    assert!(!engine.snapshot().settings.enabled);
}

#[test]
fn usage_counters_persist_across_store_instances() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("abbreviations.json");
    let usage_path = dir.path().join("usage.json");
    fs::write(&config_path, "{}").unwrap();

    {
        let store = FileStore::new(config_path.clone(), Some(usage_path.clone()));
        store.record_usage("ty", "Thank you");
        store.record_usage("ty", "Thank you");
        store.record_usage("sig", "Best");
    }

    let store = FileStore::new(config_path, Some(usage_path));
    let stats = store.usage_stats();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].trigger, "ty");
    assert_eq!(stats[0].count, 2);
    assert_eq!(stats[1].count, 1);
}

#[test]
fn clear_stats_empties_counters_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("abbreviations.json");
    let usage_path = dir.path().join("usage.json");
    fs::write(&config_path, "{}").unwrap();

    let store = FileStore::new(config_path.clone(), Some(usage_path.clone()));
    store.record_usage("ty", "Thank you");
    store.clear_stats();
    assert!(store.usage_stats().is_empty());

    let reopened = FileStore::new(config_path, Some(usage_path));
    assert!(reopened.usage_stats().is_empty());
}

#[test]
fn reload_swaps_the_snapshot_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abbreviations.json");
    fs::write(&path, r#"{"shortcuts": {"old": "Old text"}}"#).unwrap();

    let store = Rc::new(FileStore::new(path.clone(), None));
    let mut engine = Engine::new(store, SitePolicy::default(), SurfaceRegistry::default());
    engine.reload().unwrap();
    assert_eq!(engine.snapshot().abbreviations.len(), 1);

    fs::write(&path, r#"{"shortcuts": {"new": "New text", "ty": "Thank you"}}"#).unwrap();
    engine.reload().unwrap();

    let triggers: Vec<String> = engine
        .snapshot()
        .abbreviations
        .iter()
        .map(|(t, _)| t.to_string())
        .collect();
    assert_eq!(triggers, vec!["new".to_string(), "ty".to_string()]);
}

#[test]
fn corrupt_json_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abbreviations.json");
    fs::write(&path, "{not json").unwrap();

    assert!(FileStore::new(path, None).load().is_err());
}
