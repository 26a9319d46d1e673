use std::fmt::Write as _;

use token_themes_core::resolver::theme_label;
use token_themes_core::tree::{RowKind, visible_rows};
use token_themes_core::{CollapsedTokens, Settings, ThemeManager, TokenState};
use token_themes_protocol::{DEFAULT_GROUP, TokenSet};

/// Text summary of the themes by group, the active theme of each group and
/// the resolved token set statuses.
pub fn overview(state: &TokenState, settings: &Settings) -> String {
    let manager = ThemeManager::new(state, settings);
    let mut out = String::new();

    let _ = writeln!(out, "themes:");
    for section in manager.sections(state) {
        let group = section.group.unwrap_or(DEFAULT_GROUP);
        if section.group.is_none() && section.themes.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  [{group}] active: {}", theme_label(state, group));
        for theme in section.themes {
            let marker = if state.active_theme().contains_id(&theme.id) { '*' } else { ' ' };
            let sets: Vec<String> = theme
                .selected_token_sets
                .iter()
                .map(|(set, status)| format!("{set}={status}"))
                .collect();
            let _ = writeln!(out, "  {marker} {} ({}) {}", theme.name, theme.id, sets.join(", "));
        }
    }

    let _ = writeln!(out, "token sets:");
    for (set, status) in state.used_token_set() {
        let _ = writeln!(out, "  {set}: {status}");
    }
    out
}

/// Indented listing of the visible rows of one token set.
pub fn tree(set: &TokenSet, collapsed: &CollapsedTokens) -> String {
    let mut out = String::new();
    for row in visible_rows(set, collapsed) {
        let indent = "  ".repeat(row.depth);
        let _ = match row.kind {
            RowKind::Group { collapsed: true } => writeln!(out, "{indent}+ {}", row.name),
            RowKind::Group { collapsed: false } => writeln!(out, "{indent}- {}", row.name),
            RowKind::Token { token_type } => writeln!(out, "{indent}  {} : {token_type}", row.name),
        };
    }
    out
}
