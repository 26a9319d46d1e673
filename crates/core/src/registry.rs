//! The ordered theme list and the transitions that edit it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use token_themes_protocol::{
    ActiveTheme, DEFAULT_GROUP, SelectedTokenSets, ThemeObject, strip_disabled,
};

use crate::resolver;
use crate::state::{TokenState, Transition};

/// Length of generated theme ids, in hex characters.
const THEME_ID_LEN: usize = 40;

/// Data submitted by the theme editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveThemePayload {
    /// `None` or an empty id creates a new theme.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "default_group")]
    pub group: String,
    /// May contain disabled entries; they are dropped on save.
    #[serde(default)]
    pub selected_token_sets: SelectedTokenSets,
}

impl SaveThemePayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            group: default_group(),
            selected_token_sets: SelectedTokenSets::new(),
        }
    }
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

/// Content hash of the save time and the payload.
pub fn generate_theme_id(now_ms: u64, payload: &SaveThemePayload) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&now_ms.to_le_bytes());
    for field in [payload.name.as_str(), payload.group.as_str()] {
        hasher.update(field.as_bytes());
        hasher.update(&[0]);
    }
    for (set, status) in &payload.selected_token_sets {
        hasher.update(set.as_bytes());
        hasher.update(&[0, *status as u8]);
    }
    let hex = hasher.finalize().to_hex();
    hex.as_str()[..THEME_ID_LEN].to_string()
}

/// Create or update a theme.
///
/// An existing theme keeps its list position and style references. When the
/// saved theme is active in any group, the payload's group is deactivated;
/// a new theme becomes active in its group. Both cases re-run the resolver
/// without asking the host to re-apply styles.
pub fn save_theme(state: &TokenState, payload: SaveThemePayload, now_ms: u64) -> Transition {
    let given = payload.id.as_deref().filter(|id| !id.is_empty());
    let is_new = given.is_none();
    let id = match given {
        Some(id) => id.to_string(),
        None => generate_theme_id(now_ms, &payload),
    };
    let is_active = state.active_theme.contains_id(&id);
    let existing = state.themes.iter().position(|theme| theme.id == id);

    let theme = ThemeObject {
        id: id.clone(),
        name: payload.name,
        group: payload.group.clone(),
        selected_token_sets: strip_disabled(&payload.selected_token_sets),
        figma_style_references: existing
            .map(|index| state.themes[index].figma_style_references.clone())
            .unwrap_or_default(),
    };

    let mut next = state.clone();
    let themes = Arc::make_mut(&mut next.themes);
    match existing {
        Some(index) => themes[index] = theme,
        None => themes.push(theme),
    }
    tracing::debug!(id = %id, is_new, is_active, "saved theme");

    if !(is_active || is_new) {
        return Transition::new(next);
    }
    let mut active = ActiveTheme::clone(&state.active_theme);
    if is_active {
        active.remove_group(&payload.group);
    } else {
        active.set(payload.group, id);
    }
    resolver::set_active_theme(&next, active, false)
}

/// Remove a theme. Groups it was active in are cleared and the host is
/// updated. Callers confirm with the user before dispatching this.
pub fn delete_theme(state: &TokenState, id: &str) -> Transition {
    let Some(index) = state.themes.iter().position(|theme| theme.id == id) else {
        tracing::warn!(id, "cannot delete unknown theme");
        return Transition::unchanged(state);
    };
    let mut next = state.clone();
    Arc::make_mut(&mut next.themes).remove(index);

    if !state.active_theme.contains_id(id) {
        return Transition::new(next);
    }
    let mut active = ActiveTheme::clone(&state.active_theme);
    active.remove_id(id);
    resolver::set_active_theme(&next, active, true)
}

/// Replace the theme list wholesale (drag reorder). Active selections and
/// statuses are not touched.
pub fn set_themes(state: &TokenState, themes: Vec<ThemeObject>) -> Transition {
    let mut next = state.clone();
    next.themes = Arc::new(themes);
    Transition::new(next)
}

/// Reorder by id. Ids that match no theme are skipped; themes missing from
/// `ids` are dropped, as the drag list is the full list.
pub fn reorder_themes(state: &TokenState, ids: &[String]) -> Transition {
    let reordered = ids
        .iter()
        .filter_map(|id| state.theme(id).cloned())
        .collect();
    set_themes(state, reordered)
}
