//! Centralized configuration paths for expando
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/expando/`
//! - Windows: `%APPDATA%\expando\`
//!
//! This module is the single source of truth for config paths.

use std::{env, fs, path::PathBuf};

const APP_DIR: &str = "expando";

/// Base config directory for expando
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/expando`
///   - Else: `~/.config/expando`
///
/// Windows:
///   - `%APPDATA%\expando`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/expando/abbreviations.json`
pub fn abbreviations_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("abbreviations.json"))
}

/// `~/.config/expando/sites.yaml`
pub fn sites_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("sites.yaml"))
}

/// `~/.config/expando/usage.json`
pub fn usage_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("usage.json"))
}

/// `~/.config/expando/logs/` (created if missing)
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let dir = config_dir()
        .ok_or_else(|| "No config directory available".to_string())?
        .join("logs");
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create logs dir: {}", e))?;
    Ok(dir)
}
