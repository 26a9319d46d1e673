//! Host style reconciliation: keeps the active theme's style references in
//! line with styles renamed or removed in the host document.

use std::sync::Arc;

use token_themes_protocol::{ActiveTheme, StyleReferences};

use crate::resolver;
use crate::state::{TokenState, Transition};

/// For every active theme, re-key each style reference whose style id is in
/// `old_ids` to `new_id`. Style ids and entry order are kept.
pub fn rename_style_ids_to_current_theme(
    state: &TokenState,
    old_ids: &[String],
    new_id: &str,
) -> Transition {
    let indices = active_theme_indices(state);
    if indices.is_empty() {
        tracing::debug!("no active theme, style id rename ignored");
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    let themes = Arc::make_mut(&mut next.themes);
    for index in indices {
        let theme = &mut themes[index];
        theme.figma_style_references = theme
            .figma_style_references
            .iter()
            .map(|(token, style_id)| {
                if old_ids.contains(style_id) {
                    (new_id.to_string(), style_id.clone())
                } else {
                    (token.clone(), style_id.clone())
                }
            })
            .collect();
    }
    Transition::new(next)
}

/// Drop the active theme from the list when its stored style references
/// differ from `style_ids`.
///
/// This removes the whole theme rather than the listed references. The
/// behaviour is kept as the host plugin has always done it; the active theme
/// mapping is left pointing at the removed id, which then reads as "Unknown"
/// and contributes nothing to the used token sets.
pub fn remove_style_ids_to_current_theme(
    state: &TokenState,
    style_ids: &StyleReferences,
) -> Transition {
    let mut doomed = active_theme_indices(state);
    doomed.retain(|&index| state.themes[index].figma_style_references != *style_ids);
    if doomed.is_empty() {
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    let themes = Arc::make_mut(&mut next.themes);
    for &index in doomed.iter().rev() {
        let removed = themes.remove(index);
        tracing::warn!(id = %removed.id, "style references differ, active theme removed");
    }
    resolver::set_active_theme(&next, ActiveTheme::clone(&next.active_theme), false)
}

fn active_theme_indices(state: &TokenState) -> Vec<usize> {
    let mut indices: Vec<usize> = state
        .active_theme
        .ids()
        .filter_map(|id| state.themes.iter().position(|theme| theme.id == id))
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collapse::CollapsedTokens;
    use crate::token_store::TokenSetStore;
    use token_themes_protocol::{DEFAULT_GROUP, ThemeObject, TokenSet, TokenSetStatus};

    fn light() -> ThemeObject {
        ThemeObject::new("light", "Light")
            .with_style_reference("old", "S:1234")
            .with_style_reference("colors.red", "S:0283")
    }

    fn state(active: ActiveTheme) -> TokenState {
        TokenState::from_parts(
            TokenSetStore::new(),
            vec![
                light(),
                ThemeObject::new("dark", "Dark").with_style_reference("old", "S:1234"),
            ],
            active,
            CollapsedTokens::new(),
        )
    }

    #[test]
    fn renames_style_ids_on_active_theme() {
        let state = state(ActiveTheme::single(DEFAULT_GROUP, "light"));
        let old_ids = vec!["S:1234".to_string(), "S:2345".to_string()];
        let next = rename_style_ids_to_current_theme(&state, &old_ids, "new").state;

        let refs: Vec<(&str, &str)> = next.themes()[0]
            .figma_style_references
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(refs, vec![("new", "S:1234"), ("colors.red", "S:0283")]);
        assert_eq!(next.themes()[1].figma_style_references["old"], "S:1234");
        assert_eq!(state.themes()[0], light());
    }

    #[test]
    fn rename_without_active_theme_is_noop() {
        let state = state(ActiveTheme::new());
        let old_ids = ["S:1234".to_string()];
        let next = rename_style_ids_to_current_theme(&state, &old_ids, "new").state;
        assert!(Arc::ptr_eq(&state.themes, &next.themes));

        let dangling = state_with_dangling();
        let next = rename_style_ids_to_current_theme(&dangling, &old_ids, "new").state;
        assert!(Arc::ptr_eq(&dangling.themes, &next.themes));
    }

    fn state_with_dangling() -> TokenState {
        state(ActiveTheme::single(DEFAULT_GROUP, "gone"))
    }

    #[test]
    fn remove_with_different_map_drops_whole_theme() {
        let state = state(ActiveTheme::single(DEFAULT_GROUP, "light"));
        let mut supplied = StyleReferences::new();
        supplied.insert("old".into(), "S:1234".into());
        let next = remove_style_ids_to_current_theme(&state, &supplied).state;
        assert_eq!(next.themes().len(), 1);
        assert_eq!(next.themes()[0].id, "dark");
        assert_eq!(next.active_theme().get(DEFAULT_GROUP), Some("light"));
    }

    #[test]
    fn remove_with_equal_map_is_noop() {
        let state = state(ActiveTheme::single(DEFAULT_GROUP, "light"));
        let mut supplied = StyleReferences::new();
        supplied.insert("colors.red".into(), "S:0283".into());
        supplied.insert("old".into(), "S:1234".into());
        let next = remove_style_ids_to_current_theme(&state, &supplied).state;
        assert!(Arc::ptr_eq(&state.themes, &next.themes));

        let inactive =
            remove_style_ids_to_current_theme(&state_with_dangling(), &StyleReferences::new());
        assert_eq!(inactive.state.themes().len(), 2);
    }

    #[test]
    fn removed_active_theme_no_longer_enables_sets() {
        let mut tokens = TokenSetStore::new();
        tokens.insert_set("a", TokenSet::new());
        let state = TokenState::from_parts(
            tokens,
            vec![light().with_token_set("a", TokenSetStatus::Enabled)],
            ActiveTheme::single(DEFAULT_GROUP, "light"),
            CollapsedTokens::new(),
        );
        assert_eq!(state.used_token_set()["a"], TokenSetStatus::Enabled);

        let transition = remove_style_ids_to_current_theme(&state, &StyleReferences::new());
        let next = &transition.state;
        assert!(next.themes().is_empty());
        assert_eq!(next.active_theme().get(DEFAULT_GROUP), Some("light"));
        assert_eq!(next.used_token_set()["a"], TokenSetStatus::Disabled);
        assert!(transition.host_update().is_none());

        let reloaded = crate::Snapshot::from_state(next).into_state();
        assert_eq!(reloaded.used_token_set(), next.used_token_set());
    }
}
