//! Headless logic of the "manage themes" dialog: which theme the editor is
//! open on, saving from the form, confirmed deletion, reordering and the
//! new-group editor.

use std::future::Future;

use serde::Serialize;
use serde_json::json;
use token_themes_protocol::SelectedTokenSets;

use crate::groups::{self, GroupSection};
use crate::reducer::Command;
use crate::registry::SaveThemePayload;
use crate::settings::Settings;
use crate::state::TokenState;
use crate::store::Store;

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&self, text: &str) -> impl Future<Output = bool>;
}

/// Answers every question the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _text: &str) -> impl Future<Output = bool> {
        std::future::ready(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Creating,
    Editing(String),
}

/// Values submitted by the theme form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub name: String,
    pub token_sets: SelectedTokenSets,
    /// `None` keeps the edited theme's group, or uses the default group.
    pub group: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ThemeManager {
    editor: EditorState,
    group_editor_open: bool,
    new_group_name: String,
    group_names: Vec<String>,
    default_group: String,
    delete_prompt: String,
}

impl ThemeManager {
    pub fn new(state: &TokenState, settings: &Settings) -> Self {
        Self {
            editor: EditorState::Closed,
            group_editor_open: false,
            new_group_name: String::new(),
            group_names: groups::group_names(state.themes()),
            default_group: settings.store.default_group.clone(),
            delete_prompt: settings.editor.delete_prompt.clone(),
        }
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// With a theme id: open the editor on it, or close it if it is already
    /// open on that theme. Without: flip between closed and "new theme".
    pub fn toggle_editor(&mut self, theme_id: Option<&str>) {
        self.editor = match (theme_id, &self.editor) {
            (Some(id), EditorState::Editing(open)) if open == id => EditorState::Closed,
            (Some(id), _) => EditorState::Editing(id.to_string()),
            (None, EditorState::Closed) => EditorState::Creating,
            (None, _) => EditorState::Closed,
        };
    }

    pub fn cancel(&mut self) {
        self.editor = EditorState::Closed;
    }

    /// Form defaults for the theme being edited.
    pub fn default_values(&self, state: &TokenState) -> Option<FormValues> {
        let EditorState::Editing(id) = &self.editor else {
            return None;
        };
        state.theme(id).map(|theme| FormValues {
            name: theme.name.clone(),
            token_sets: theme.selected_token_sets.clone(),
            group: Some(theme.group.clone()),
        })
    }

    /// Save the form and close the editor. Ignored while the editor is closed.
    pub fn submit(&mut self, store: &mut Store, values: FormValues) {
        let id = match &self.editor {
            EditorState::Closed => {
                tracing::warn!("theme form submitted with the editor closed");
                return;
            }
            EditorState::Creating => None,
            EditorState::Editing(id) => Some(id.clone()),
        };
        match &id {
            Some(id) => store.track("Edit theme", json!({ "id": id, "values": values })),
            None => store.track("Create theme", json!({ "values": values })),
        }

        let group = values
            .group
            .or_else(|| {
                id.as_deref()
                    .and_then(|id| store.state().theme(id))
                    .map(|theme| theme.group.clone())
            })
            .unwrap_or_else(|| self.default_group.clone());
        store.dispatch(Command::SaveTheme(SaveThemePayload {
            id,
            name: values.name,
            group,
            selected_token_sets: values.token_sets,
        }));
        self.editor = EditorState::Closed;
    }

    /// Delete the theme open in the editor once the user confirms.
    ///
    /// A declined confirmation leaves both the state and the editor as they
    /// were. Returns whether the theme was deleted.
    pub async fn delete_current(&mut self, store: &mut Store, confirm: &impl Confirm) -> bool {
        let EditorState::Editing(id) = &self.editor else {
            return false;
        };
        let id = id.clone();
        if !confirm.confirm(&self.delete_prompt).await {
            tracing::debug!(id = %id, "theme deletion declined");
            return false;
        }
        store.track("Delete theme", json!({ "id": id }));
        store.dispatch(Command::DeleteTheme { id });
        self.editor = EditorState::Closed;
        true
    }

    /// Apply the order of a drag-and-drop list.
    pub fn reorder(&self, store: &mut Store, ids: Vec<String>) {
        store.dispatch(Command::ReorderThemes { ids });
    }

    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    pub fn sections<'a>(&'a self, state: &'a TokenState) -> Vec<GroupSection<'a>> {
        groups::themes_by_group(state.themes(), &self.group_names)
    }

    pub fn show_group_editor(&mut self) {
        self.group_editor_open = true;
    }

    pub fn is_group_editor_open(&self) -> bool {
        self.group_editor_open
    }

    pub fn set_new_group_name(&mut self, name: impl Into<String>) {
        self.new_group_name = name.into();
    }

    pub fn new_group_name(&self) -> &str {
        &self.new_group_name
    }

    pub fn is_new_group_name_valid(&self) -> bool {
        groups::is_new_group_name_valid(&self.new_group_name, &self.group_names)
    }

    /// Add the typed group as an empty section. Invalid names are ignored,
    /// the save button being disabled for them.
    pub fn save_new_group(&mut self) -> bool {
        if !self.is_new_group_name_valid() {
            return false;
        }
        self.group_names.push(self.new_group_name.clone());
        true
    }

    pub fn reset_new_group_name(&mut self) {
        self.new_group_name.clear();
    }
}
