//! Token set and token edits.
//!
//! Each edit also rewrites what refers to the edited name: theme statuses
//! and the used token set for set renames, style references and collapsed
//! paths for token renames.

use std::sync::Arc;

use token_themes_protocol::{ActiveTheme, Token, TokenSet};

use crate::resolver;
use crate::state::{TokenState, Transition};
use crate::token_store::{TokenStoreError, rebase_path};

/// Add or replace a whole token set, then refresh the used token sets.
pub fn set_token_set(state: &TokenState, name: &str, set: TokenSet) -> Transition {
    let mut next = state.clone();
    Arc::make_mut(&mut next.tokens).insert_set(name, set);
    refresh_used(&next)
}

pub fn remove_token_set(state: &TokenState, name: &str) -> Transition {
    let mut next = state.clone();
    if let Err(err) = Arc::make_mut(&mut next.tokens).remove_set(name) {
        return rejected(state, &err);
    }
    if state
        .themes
        .iter()
        .any(|theme| theme.selected_token_sets.contains_key(name))
    {
        for theme in Arc::make_mut(&mut next.themes) {
            theme.selected_token_sets.shift_remove(name);
        }
    }
    refresh_used(&next)
}

pub fn rename_token_set(state: &TokenState, from: &str, to: &str) -> Transition {
    let mut next = state.clone();
    if let Err(err) = Arc::make_mut(&mut next.tokens).rename_set(from, to) {
        return rejected(state, &err);
    }
    if state
        .themes
        .iter()
        .any(|theme| theme.selected_token_sets.contains_key(from))
    {
        for theme in Arc::make_mut(&mut next.themes) {
            if let Some((index, _, status)) = theme.selected_token_sets.shift_remove_full(from) {
                theme
                    .selected_token_sets
                    .shift_insert(index, to.to_string(), status);
            }
        }
    }
    refresh_used(&next)
}

pub fn upsert_token(state: &TokenState, set: &str, token: Token) -> Transition {
    let mut next = state.clone();
    match Arc::make_mut(&mut next.tokens).upsert_token(set, token) {
        Ok(()) => Transition::new(next),
        Err(err) => rejected(state, &err),
    }
}

pub fn remove_token(state: &TokenState, set: &str, path: &str) -> Transition {
    let mut next = state.clone();
    match Arc::make_mut(&mut next.tokens).remove_token(set, path) {
        Ok(_) => Transition::new(next),
        Err(err) => rejected(state, &err),
    }
}

/// Move a token or group. Style references keyed by a moved token name and
/// collapsed paths under the moved node follow it.
pub fn rename_token_path(state: &TokenState, set: &str, from: &str, to: &str) -> Transition {
    let mut next = state.clone();
    if let Err(err) = Arc::make_mut(&mut next.tokens).rename_path(set, from, to) {
        return rejected(state, &err);
    }

    let references_moved = state.themes.iter().any(|theme| {
        theme
            .figma_style_references
            .keys()
            .any(|token| rebase_path(token, from, to).is_some())
    });
    if references_moved {
        for theme in Arc::make_mut(&mut next.themes) {
            theme.figma_style_references = theme
                .figma_style_references
                .iter()
                .map(|(token, style_id)| {
                    let token = rebase_path(token, from, to).unwrap_or_else(|| token.clone());
                    (token, style_id.clone())
                })
                .collect();
        }
    }

    let mut collapsed = state.collapsed_tokens.as_ref().clone();
    if collapsed.rebase(from, to) {
        next.collapsed_tokens = Arc::new(collapsed);
    }
    Transition::new(next)
}

// Token set membership changed: the used map must list exactly the known
// sets. The host is not asked to re-apply anything.
fn refresh_used(next: &TokenState) -> Transition {
    resolver::set_active_theme(next, ActiveTheme::clone(&next.active_theme), false)
}

fn rejected(state: &TokenState, err: &TokenStoreError) -> Transition {
    tracing::warn!(error = %err, "token edit rejected");
    Transition::unchanged(state)
}
