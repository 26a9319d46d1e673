use std::sync::Arc;

use serde::{Deserialize, Serialize};
use token_themes_protocol::{ActiveTheme, StyleReferences, ThemeObject, Token, TokenSet};

use crate::collapse::CollapsedTokens;
use crate::registry::{self, SaveThemePayload};
use crate::state::{TokenState, Transition};
use crate::{edits, reconcile, resolver};

/// Every state transition the token state accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    SaveTheme(SaveThemePayload),
    /// Already confirmed by the user.
    DeleteTheme { id: String },
    SetThemes { themes: Vec<ThemeObject> },
    ReorderThemes { ids: Vec<String> },
    SetActiveTheme {
        active_theme: ActiveTheme,
        #[serde(default = "update_nodes_default")]
        should_update_nodes: bool,
    },
    SelectTheme { id: String },
    ClearActiveThemes,
    RenameStyleIds { old_ids: Vec<String>, new_id: String },
    RemoveStyleIds { style_ids: StyleReferences },
    ToggleCollapsed { path: String },
    SetCollapsedTokens { paths: Vec<String> },
    SetTokenSet { name: String, set: TokenSet },
    RemoveTokenSet { name: String },
    RenameTokenSet { from: String, to: String },
    UpsertToken { set: String, token: Token },
    RemoveToken { set: String, path: String },
    RenameTokenPath { set: String, from: String, to: String },
}

fn update_nodes_default() -> bool {
    true
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SaveTheme(_) => "saveTheme",
            Command::DeleteTheme { .. } => "deleteTheme",
            Command::SetThemes { .. } => "setThemes",
            Command::ReorderThemes { .. } => "reorderThemes",
            Command::SetActiveTheme { .. } => "setActiveTheme",
            Command::SelectTheme { .. } => "selectTheme",
            Command::ClearActiveThemes => "clearActiveThemes",
            Command::RenameStyleIds { .. } => "renameStyleIdsToCurrentTheme",
            Command::RemoveStyleIds { .. } => "removeStyleIdsToCurrentTheme",
            Command::ToggleCollapsed { .. } => "toggleCollapsed",
            Command::SetCollapsedTokens { .. } => "setCollapsedTokens",
            Command::SetTokenSet { .. } => "setTokenSet",
            Command::RemoveTokenSet { .. } => "removeTokenSet",
            Command::RenameTokenSet { .. } => "renameTokenSet",
            Command::UpsertToken { .. } => "upsertToken",
            Command::RemoveToken { .. } => "removeToken",
            Command::RenameTokenPath { .. } => "renameTokenPath",
        }
    }
}

/// Apply one command. Pure: `state` is never modified and `now_ms` is the
/// only source of time.
pub fn reduce(state: &TokenState, command: Command, now_ms: u64) -> Transition {
    match command {
        Command::SaveTheme(payload) => registry::save_theme(state, payload, now_ms),
        Command::DeleteTheme { id } => registry::delete_theme(state, &id),
        Command::SetThemes { themes } => registry::set_themes(state, themes),
        Command::ReorderThemes { ids } => registry::reorder_themes(state, &ids),
        Command::SetActiveTheme {
            active_theme,
            should_update_nodes,
        } => resolver::set_active_theme(state, active_theme, should_update_nodes),
        Command::SelectTheme { id } => resolver::select_theme(state, &id),
        Command::ClearActiveThemes => resolver::clear_active_themes(state),
        Command::RenameStyleIds { old_ids, new_id } => {
            reconcile::rename_style_ids_to_current_theme(state, &old_ids, &new_id)
        }
        Command::RemoveStyleIds { style_ids } => {
            reconcile::remove_style_ids_to_current_theme(state, &style_ids)
        }
        Command::ToggleCollapsed { path } => {
            let mut next = state.clone();
            Arc::make_mut(&mut next.collapsed_tokens).toggle(&path);
            Transition::new(next)
        }
        Command::SetCollapsedTokens { paths } => {
            let mut next = state.clone();
            next.collapsed_tokens = Arc::new(CollapsedTokens::from(paths));
            Transition::new(next)
        }
        Command::SetTokenSet { name, set } => edits::set_token_set(state, &name, set),
        Command::RemoveTokenSet { name } => edits::remove_token_set(state, &name),
        Command::RenameTokenSet { from, to } => edits::rename_token_set(state, &from, &to),
        Command::UpsertToken { set, token } => edits::upsert_token(state, &set, token),
        Command::RemoveToken { set, path } => edits::remove_token(state, &set, &path),
        Command::RenameTokenPath { set, from, to } => {
            edits::rename_token_path(state, &set, &from, &to)
        }
    }
}
