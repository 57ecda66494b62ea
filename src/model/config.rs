use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::parse::TagMode;

/// Longest autosave interval honored (one day)
pub const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Longest persistence debounce honored (one minute)
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Configuration from fundo.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundoConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub autosave: AutosaveConfig,
    #[serde(default)]
    pub persist: PersistConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value snapshot and the recovery log.
    /// If absent, state lives in memory only.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        AutosaveConfig {
            enabled: true,
            interval_secs: default_interval_secs(),
        }
    }
}

impl AutosaveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.clamp(1, MAX_INTERVAL_SECS))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for PersistConfig {
    fn default() -> Self {
        PersistConfig {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl PersistConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.min(MAX_DEBOUNCE_MS))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_filename")]
    pub default_filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            default_filename: default_filename(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// `multi`, or `legacy-single` for data kept in the one-tag schema
    #[serde(default)]
    pub tag_mode: TagMode,
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    60
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_filename() -> String {
    "fundo-backup.json".to_string()
}
