use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use token_themes_protocol::DEFAULT_GROUP;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_DELETE_PROMPT: &str = "Are you sure you want to delete this theme?";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("reading settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables, loaded from TOML. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub editor: EditorSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Group given to themes created without one.
    pub default_group: String,
    /// How many previous states the store keeps.
    pub history_limit: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_group: DEFAULT_GROUP.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub delete_prompt: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            delete_prompt: DEFAULT_DELETE_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing-subscriber` env-filter directive.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
