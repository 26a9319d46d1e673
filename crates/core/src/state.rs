use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use token_themes_protocol::{ActiveTheme, StyleReferences, ThemeObject, UsedTokenSet};

use crate::collapse::CollapsedTokens;
use crate::token_store::TokenSetStore;

/// The whole token and theme state at one point in time.
///
/// Every container sits behind an `Arc`. Transitions clone the state (cheap)
/// and copy-on-write only the containers they change, so a snapshot handed
/// out earlier never observes later edits.
#[derive(Debug, Clone, Default)]
pub struct TokenState {
    pub(crate) tokens: Arc<TokenSetStore>,
    pub(crate) themes: Arc<Vec<ThemeObject>>,
    pub(crate) active_theme: Arc<ActiveTheme>,
    pub(crate) used_token_set: Arc<UsedTokenSet>,
    pub(crate) collapsed_tokens: Arc<CollapsedTokens>,
}

impl TokenState {
    /// Assemble a state and derive its used token sets. Emits nothing.
    pub fn from_parts(
        tokens: TokenSetStore,
        themes: Vec<ThemeObject>,
        active_theme: ActiveTheme,
        collapsed_tokens: CollapsedTokens,
    ) -> Self {
        let mut state = Self {
            tokens: Arc::new(tokens),
            themes: Arc::new(themes),
            active_theme: Arc::new(active_theme),
            used_token_set: Arc::default(),
            collapsed_tokens: Arc::new(collapsed_tokens),
        };
        state.used_token_set = Arc::new(crate::resolver::resolve_used_token_set(
            &state.tokens,
            &state.themes,
            &state.active_theme,
        ));
        state
    }

    pub fn tokens(&self) -> &TokenSetStore {
        &self.tokens
    }

    pub fn themes(&self) -> &[ThemeObject] {
        &self.themes
    }

    pub fn theme(&self, id: &str) -> Option<&ThemeObject> {
        self.themes.iter().find(|theme| theme.id == id)
    }

    pub fn active_theme(&self) -> &ActiveTheme {
        &self.active_theme
    }

    pub fn used_token_set(&self) -> &UsedTokenSet {
        &self.used_token_set
    }

    pub fn collapsed_tokens(&self) -> &CollapsedTokens {
        &self.collapsed_tokens
    }

    /// Style references of every active theme that exists, by group.
    pub fn active_style_references(&self) -> IndexMap<String, StyleReferences> {
        self.active_theme
            .iter()
            .filter_map(|(group, id)| {
                self.theme(id)
                    .map(|theme| (group.to_string(), theme.figma_style_references.clone()))
            })
            .collect()
    }
}

/// Payload sent to the host after the active themes change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostUpdate {
    pub used_token_set: UsedTokenSet,
    /// Group → style references of the theme active in that group.
    pub style_references: IndexMap<String, StyleReferences>,
}

/// Side effects requested by a transition, performed by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Effect {
    Track {
        event: String,
        payload: serde_json::Value,
    },
    UpdateHost(HostUpdate),
}

impl Effect {
    pub fn track(event: impl Into<String>) -> Self {
        Effect::Track {
            event: event.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn track_with(event: impl Into<String>, payload: serde_json::Value) -> Self {
        Effect::Track {
            event: event.into(),
            payload,
        }
    }
}

/// Result of a single state transition.
#[derive(Debug, Clone)]
#[must_use]
pub struct Transition {
    pub state: TokenState,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn new(state: TokenState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    /// The input state, shared as-is.
    pub fn unchanged(state: &TokenState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn tracked_events(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Track { event, .. } => Some(event.as_str()),
            Effect::UpdateHost(_) => None,
        })
    }

    pub fn host_update(&self) -> Option<&HostUpdate> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::UpdateHost(update) => Some(update),
            Effect::Track { .. } => None,
        })
    }
}
