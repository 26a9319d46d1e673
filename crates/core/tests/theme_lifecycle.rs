//! Integration test: load a stored plugin state, attach token sets, and walk
//! the theme lifecycle through the store as the plugin UI would.

use std::cell::RefCell;
use std::rc::Rc;

use token_themes_core::resolver::{ThemeLabel, theme_label};
use token_themes_core::token_store::token_set_from_deep_json;
use token_themes_core::tree::visible_rows;
use token_themes_core::{
    AutoConfirm, Command, HostBridge, HostUpdate, SaveThemePayload, Settings, Snapshot, Store,
    ThemeManager,
};
use token_themes_protocol::{ActiveTheme, TokenSet, TokenSetStatus};

#[derive(Clone, Default)]
struct HostLog(Rc<RefCell<Vec<HostUpdate>>>);

impl HostBridge for HostLog {
    fn apply(&self, update: &HostUpdate) {
        self.0.borrow_mut().push(update.clone());
    }
}

fn loaded_store(host: HostLog) -> Store {
    let snapshot = Snapshot::from_json(include_str!("fixtures/plugin-state.json"))
        .expect("fixture snapshot should parse");
    let global: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/sizing-tokens.json"))
            .expect("fixture tokens should parse");
    let global = token_set_from_deep_json(&global).expect("fixture tokens should import");

    let mut store = Store::new(snapshot.into_state()).with_host(host);
    store.dispatch(Command::SetTokenSet {
        name: "global".into(),
        set: global,
    });
    for name in ["light", "dark", "compact"] {
        store.dispatch(Command::SetTokenSet {
            name: name.into(),
            set: TokenSet::new(),
        });
    }
    store
}

#[test]
fn loaded_state_resolves_active_theme() {
    let host = HostLog::default();
    let store = loaded_store(host.clone());
    let state = store.state();

    assert_eq!(state.themes().len(), 3);
    assert!(
        state.themes()[1].selected_token_sets.get("light").is_none(),
        "disabled statuses are dropped on load"
    );
    let used = state.used_token_set();
    assert_eq!(used["global"], TokenSetStatus::Source);
    assert_eq!(used["light"], TokenSetStatus::Enabled);
    assert_eq!(used["dark"], TokenSetStatus::Disabled);
    assert_eq!(used["compact"], TokenSetStatus::Disabled);
    assert!(host.0.borrow().is_empty(), "adding token sets never updates the host");
    assert_eq!(theme_label(state, "mode"), ThemeLabel::Named("Light".into()));
    assert_eq!(theme_label(state, "density"), ThemeLabel::None);
}

#[test]
fn selecting_themes_in_two_groups() {
    let host = HostLog::default();
    let mut store = loaded_store(host.clone());
    store.dispatch(Command::SelectTheme { id: "compact".into() });
    store.dispatch(Command::SelectTheme { id: "dark".into() });

    let state = store.state();
    assert_eq!(state.active_theme().get("mode"), Some("dark"));
    assert_eq!(state.active_theme().get("density"), Some("compact"));
    assert_eq!(state.used_token_set()["compact"], TokenSetStatus::Enabled);
    assert_eq!(state.used_token_set()["dark"], TokenSetStatus::Enabled);
    assert_eq!(state.used_token_set()["light"], TokenSetStatus::Disabled);

    let updates = host.0.borrow();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1].style_references.len(), 2);
}

#[test]
fn renaming_host_styles_on_active_theme() {
    let mut store = loaded_store(HostLog::default());
    store.dispatch(Command::RenameStyleIds {
        old_ids: vec!["S:1234".into(), "S:2345".into()],
        new_id: "new".into(),
    });
    let refs: Vec<(String, String)> = store
        .state()
        .theme("light")
        .map(|t| t.figma_style_references.clone().into_iter().collect())
        .expect("light theme is kept");
    assert_eq!(
        refs,
        vec![
            ("new".to_string(), "S:1234".to_string()),
            ("colors.red".to_string(), "S:0283".to_string()),
        ]
    );
}

#[test]
fn editing_active_theme_skips_host_and_deleting_clears_group() {
    let host = HostLog::default();
    let mut store = loaded_store(host.clone());
    let before = store.state().clone();

    let mut payload = SaveThemePayload::new("Light (edited)");
    payload.id = Some("light".into());
    payload.group = "mode".into();
    payload
        .selected_token_sets
        .insert("light".into(), TokenSetStatus::Enabled);
    payload
        .selected_token_sets
        .insert("global".into(), TokenSetStatus::Disabled);
    store.dispatch(Command::SaveTheme(payload));

    let edited = store.state().theme("light").cloned().expect("edited theme is kept");
    assert_eq!(edited.name, "Light (edited)");
    assert_eq!(edited.selected_token_sets.len(), 1);
    assert_eq!(edited.figma_style_references.len(), 2);
    assert!(host.0.borrow().is_empty());
    assert_eq!(before.themes()[0].name, "Light", "earlier snapshots are untouched");

    store.dispatch(Command::SetActiveTheme {
        active_theme: ActiveTheme::single("mode", "light"),
        should_update_nodes: false,
    });
    let mut manager = ThemeManager::new(store.state(), &Settings::default());
    manager.toggle_editor(Some("light"));
    let deleted = pollster::block_on(manager.delete_current(&mut store, &AutoConfirm(true)));
    assert!(deleted);

    let state = store.state();
    assert!(state.theme("light").is_none());
    assert_eq!(state.active_theme().get("mode"), None);
    assert!(state.used_token_set().values().all(|s| s.is_disabled()));
    assert_eq!(host.0.borrow().len(), 1);
}

#[test]
fn token_tree_collapse_and_rename() {
    let mut store = loaded_store(HostLog::default());
    store.dispatch(Command::ToggleCollapsed { path: "size.font".into() });
    store.dispatch(Command::ToggleCollapsed { path: "color".into() });
    assert_eq!(store.state().collapsed_tokens().paths(), ["size.font", "color"]);

    let global = store.state().tokens().get("global").expect("global set is loaded");
    let rows = visible_rows(global, store.state().collapsed_tokens());
    let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["size", "size.1", "size.2", "size.font", "color", "other"]);

    store.dispatch(Command::RenameTokenPath {
        set: "global".into(),
        from: "size.font".into(),
        to: "typography.size".into(),
    });
    assert_eq!(store.state().collapsed_tokens().paths(), ["typography.size", "color"]);
    let moved = store
        .state()
        .tokens()
        .get("global")
        .and_then(|set| set.token("typography.size.small"))
        .map(|t| t.name.clone());
    assert_eq!(moved.as_deref(), Some("typography.size.small"));
}

#[test]
fn snapshot_roundtrip_after_edits() {
    let mut store = loaded_store(HostLog::default());
    store.dispatch(Command::ReorderThemes {
        ids: vec!["compact".into(), "dark".into(), "light".into()],
    });
    let snapshot = Snapshot::from_state(store.state());
    let text = snapshot.to_json_pretty().expect("snapshot should serialize");
    assert!(!text.contains("\"disabled\""));

    let reloaded = Snapshot::from_json(&text).expect("snapshot should reload");
    assert_eq!(reloaded, snapshot);
    let state = reloaded.into_state();
    assert_eq!(state.themes()[0].id, "compact");
    assert_eq!(state.used_token_set(), store.state().used_token_set());
}
