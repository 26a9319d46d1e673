use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use token_themes_protocol::{ActiveTheme, ThemeObject, TokenSet};

use crate::collapse::CollapsedTokens;
use crate::state::TokenState;
use crate::token_store::TokenSetStore;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The durable shape of the token state, as handed to the host for storage.
///
/// The used token set is derived and therefore not stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub tokens: IndexMap<String, TokenSet>,
    #[serde(default)]
    pub themes: Vec<ThemeObject>,
    #[serde(default)]
    pub active_theme: ActiveTheme,
    #[serde(default)]
    pub collapsed_tokens: CollapsedTokens,
}

impl Snapshot {
    pub fn from_state(state: &TokenState) -> Self {
        Self {
            tokens: state
                .tokens()
                .iter()
                .map(|(name, set)| (name.to_string(), set.clone()))
                .collect(),
            themes: state.themes().to_vec(),
            active_theme: state.active_theme().clone(),
            collapsed_tokens: state.collapsed_tokens().clone(),
        }
    }

    pub fn into_state(self) -> TokenState {
        let mut tokens = TokenSetStore::new();
        for (name, set) in self.tokens {
            tokens.insert_set(name, set);
        }
        TokenState::from_parts(tokens, self.themes, self.active_theme, self.collapsed_tokens)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
