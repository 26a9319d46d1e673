//! Active theme resolution.
//!
//! Each theme group holds at most one active theme. [`resolve_group`] gives
//! the statuses selected by one group's theme and is the per-group source of
//! truth. The used token set map is a convenience overlay of all groups:
//! every known token set starts disabled and each active theme (in group
//! order) overlays the statuses it selects, so a later group wins when two
//! groups select the same set. Consumers needing their own precedence across
//! groups should combine [`resolve_group`] results instead.

use std::sync::Arc;

use token_themes_protocol::{ActiveTheme, ThemeObject, TokenSetStatus, UsedTokenSet};

use crate::state::{Effect, HostUpdate, TokenState, Transition};
use crate::token_store::TokenSetStore;

pub const SET_ACTIVE_THEME_EVENT: &str = "setActiveTheme";

/// Derive the used token set map. Dangling theme ids contribute nothing.
pub fn resolve_used_token_set(
    tokens: &TokenSetStore,
    themes: &[ThemeObject],
    active_theme: &ActiveTheme,
) -> UsedTokenSet {
    let mut used: UsedTokenSet = tokens
        .names()
        .map(|name| (name.to_string(), TokenSetStatus::Disabled))
        .collect();
    for id in active_theme.ids() {
        let Some(theme) = themes.iter().find(|theme| theme.id == id) else {
            continue;
        };
        for (set, status) in &theme.selected_token_sets {
            if let Some(slot) = used.get_mut(set) {
                *slot = *status;
            }
        }
    }
    used
}

/// Effective statuses contributed by a single group's active theme.
pub fn resolve_group(state: &TokenState, group: &str) -> UsedTokenSet {
    let theme = state
        .active_theme
        .get(group)
        .and_then(|id| state.theme(id));
    state
        .tokens
        .names()
        .map(|name| {
            let status = theme.map_or(TokenSetStatus::Disabled, |t| t.status_of(name));
            (name.to_string(), status)
        })
        .collect()
}

/// Store a new active theme mapping and recompute the used token sets.
///
/// `should_update_nodes` controls whether the host is asked to re-apply
/// styles afterwards; in-place saves of the active theme pass `false`.
pub fn set_active_theme(
    state: &TokenState,
    active_theme: ActiveTheme,
    should_update_nodes: bool,
) -> Transition {
    let used = resolve_used_token_set(&state.tokens, &state.themes, &active_theme);
    let mut next = state.clone();
    next.active_theme = Arc::new(active_theme);
    next.used_token_set = Arc::new(used);

    tracing::debug!(
        groups = next.active_theme.len(),
        should_update_nodes,
        "resolved active themes"
    );

    let mut transition = Transition::new(next).with_effect(Effect::track(SET_ACTIVE_THEME_EVENT));
    if should_update_nodes {
        let update = HostUpdate {
            used_token_set: transition.state.used_token_set().clone(),
            style_references: transition.state.active_style_references(),
        };
        transition = transition.with_effect(Effect::UpdateHost(update));
    }
    transition
}

/// Theme selector behaviour: picking the theme already active in its group
/// clears that group, anything else activates it there.
pub fn select_theme(state: &TokenState, id: &str) -> Transition {
    let Some(theme) = state.theme(id) else {
        tracing::warn!(id, "cannot select unknown theme");
        return Transition::unchanged(state);
    };
    let mut active = ActiveTheme::clone(&state.active_theme);
    if active.get(&theme.group) == Some(id) {
        active.remove_group(&theme.group);
    } else {
        active.set(theme.group.clone(), id);
    }
    set_active_theme(state, active, true)
}

/// Deactivate every group.
pub fn clear_active_themes(state: &TokenState) -> Transition {
    set_active_theme(state, ActiveTheme::new(), true)
}

/// What the theme selector shows for a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeLabel {
    /// No theme is active in the group.
    None,
    Named(String),
    /// The active id no longer matches any theme.
    Unknown,
}

impl std::fmt::Display for ThemeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeLabel::None => f.write_str("None"),
            ThemeLabel::Named(name) => f.write_str(name),
            ThemeLabel::Unknown => f.write_str("Unknown"),
        }
    }
}

pub fn theme_label(state: &TokenState, group: &str) -> ThemeLabel {
    match state.active_theme.get(group) {
        None => ThemeLabel::None,
        Some(id) => state
            .theme(id)
            .map_or(ThemeLabel::Unknown, |theme| ThemeLabel::Named(theme.name.clone())),
    }
}
