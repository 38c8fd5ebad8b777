//! Persistent configuration handling for ChatBar.
//!
//! Persists configuration in a JSON file:
//! `~/.config/chatbar/config.json`.
//!
//! Everything is optional with built-in defaults; a missing or malformed file
//! falls back to defaults with a warning. Only the log level and the global
//! hotkey are configurable — the chat URL, popup size, and zoom behavior are
//! build-time constants.

use std::fs;
use std::io;
use std::path::PathBuf;

use dirs::config_dir;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const APP_CONFIG_DIR_NAME: &str = "chatbar";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ERROR" => Some(Self::Error),
            "WARN" | "WARNING" => Some(Self::Warn),
            "INFO" => Some(Self::Info),
            "DEBUG" => Some(Self::Debug),
            "TRACE" => Some(Self::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    hotkey_enabled: Option<bool>,
    #[serde(default)]
    hotkey_modifiers: Option<String>,
    #[serde(default)]
    hotkey_key: Option<String>,
}

/// Effective hotkey settings after defaults are applied.
#[derive(Debug, Clone)]
pub struct HotkeyConfig {
    pub enabled: bool,
    pub modifiers: String,
    pub key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        #[cfg(target_os = "macos")]
        let modifiers = "control+command".to_string();
        #[cfg(not(target_os = "macos"))]
        let modifiers = "control+alt".to_string();

        Self {
            enabled: true,
            modifiers,
            key: "c".to_string(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    let path = config_dir()?
        .join(APP_CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME);
    Some(path)
}

fn load_raw_config() -> Result<RawConfig, ConfigError> {
    let Some(path) = config_path() else {
        debug!("No config_dir available, using defaults only");
        return Ok(RawConfig::default());
    };

    if !path.exists() {
        debug!(?path, "Config file does not exist, using defaults");
        return Ok(RawConfig::default());
    }

    let data = fs::read_to_string(&path)?;
    let cfg = serde_json::from_str(&data)?;
    debug!(?path, "Config loaded");
    Ok(cfg)
}

fn load_or_default_config() -> RawConfig {
    match load_raw_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            warn!(error = ?err, "Failed to load existing config, using defaults");
            RawConfig::default()
        }
    }
}

pub fn load_log_level() -> LogLevel {
    match load_raw_config() {
        Ok(cfg) => cfg
            .log_level
            .as_deref()
            .and_then(LogLevel::from_str)
            .unwrap_or_default(),
        Err(err) => {
            // Logging is not initialized yet when this runs.
            eprintln!("Config: failed to load config, using default log level: {err:?}");
            LogLevel::default()
        }
    }
}

pub fn load_hotkey_config() -> HotkeyConfig {
    let raw = load_or_default_config();
    let defaults = HotkeyConfig::default();
    HotkeyConfig {
        enabled: raw.hotkey_enabled.unwrap_or(defaults.enabled),
        modifiers: raw
            .hotkey_modifiers
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.modifiers),
        key: raw
            .hotkey_key
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_common_spellings() {
        assert_eq!(LogLevel::from_str("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("Debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("nope"), None);
    }

    #[test]
    fn default_hotkey_is_modifier_plus_c() {
        let cfg = HotkeyConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.key, "c");
        assert!(cfg.modifiers.contains("control"));
    }

    #[test]
    fn raw_config_tolerates_unknown_and_missing_fields() {
        let cfg: RawConfig = serde_json::from_str(r#"{"log_level":"debug","extra":1}"#).unwrap();
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert!(cfg.hotkey_key.is_none());
    }

    #[test]
    fn log_level_round_trips_as_str() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert_eq!(LogLevel::from_str(level.as_str()), Some(level));
        }
    }
}
