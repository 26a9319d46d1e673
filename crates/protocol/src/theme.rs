use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::status::TokenSetStatus;

/// Group name used for themes that were never assigned to a group.
pub const DEFAULT_GROUP: &str = "empty";

/// Token set name → status, as stored on a theme. Never holds `Disabled`.
pub type SelectedTokenSets = IndexMap<String, TokenSetStatus>;

/// Token name → host style id.
pub type StyleReferences = IndexMap<String, String>;

/// A named bundle of token sets, scoped to a theme group, with the host
/// styles each of its tokens is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeObject {
    pub id: String,
    pub name: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(
        default,
        serialize_with = "serialize_selected",
        deserialize_with = "deserialize_selected"
    )]
    pub selected_token_sets: SelectedTokenSets,
    #[serde(rename = "$figmaStyleReferences", default)]
    pub figma_style_references: StyleReferences,
}

impl ThemeObject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: default_group(),
            selected_token_sets: SelectedTokenSets::new(),
            figma_style_references: StyleReferences::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_token_set(mut self, name: impl Into<String>, status: TokenSetStatus) -> Self {
        if !status.is_disabled() {
            self.selected_token_sets.insert(name.into(), status);
        }
        self
    }

    pub fn with_style_reference(
        mut self,
        token: impl Into<String>,
        style_id: impl Into<String>,
    ) -> Self {
        self.figma_style_references.insert(token.into(), style_id.into());
        self
    }

    /// Status of a token set within this theme; absent entries are disabled.
    pub fn status_of(&self, token_set: &str) -> TokenSetStatus {
        self.selected_token_sets
            .get(token_set)
            .copied()
            .unwrap_or(TokenSetStatus::Disabled)
    }
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

/// Drop every `Disabled` entry, keeping the order of the rest.
pub fn strip_disabled(sets: &SelectedTokenSets) -> SelectedTokenSets {
    sets.iter()
        .filter(|(_, status)| !status.is_disabled())
        .map(|(name, status)| (name.clone(), *status))
        .collect()
}

fn serialize_selected<S: Serializer>(
    sets: &SelectedTokenSets,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(sets.iter().filter(|(_, status)| !status.is_disabled()))
}

fn deserialize_selected<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SelectedTokenSets, D::Error> {
    let sets = Option::<SelectedTokenSets>::deserialize(deserializer)?.unwrap_or_default();
    Ok(strip_disabled(&sets))
}

/// Theme group → id of the theme active in that group.
///
/// Ids are not checked against the theme list; a dangling id is legal and
/// resolves to an "Unknown" theme.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ActiveTheme(IndexMap<String, String>);

impl ActiveTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(group: impl Into<String>, id: impl Into<String>) -> Self {
        let mut active = Self::new();
        active.set(group, id);
        active
    }

    pub fn get(&self, group: &str) -> Option<&str> {
        self.0.get(group).map(String::as_str)
    }

    /// Activate `id` in `group`, keeping the group's position if it already exists.
    pub fn set(&mut self, group: impl Into<String>, id: impl Into<String>) {
        self.0.insert(group.into(), id.into());
    }

    pub fn remove_group(&mut self, group: &str) -> Option<String> {
        self.0.shift_remove(group)
    }

    /// Remove every group pointing at `id`. Returns the groups that were cleared.
    pub fn remove_id(&mut self, id: &str) -> Vec<String> {
        let groups: Vec<String> = self.groups_of(id).map(str::to_string).collect();
        self.0.retain(|_, active| active != id);
        groups
    }

    /// Whether `id` is active in any group.
    pub fn contains_id(&self, id: &str) -> bool {
        self.0.values().any(|active| active == id)
    }

    pub fn groups_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(_, active)| active.as_str() == id)
            .map(|(group, _)| group.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(group, id)| (group.as_str(), id.as_str()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ActiveTheme {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActiveThemeRepr {
    Legacy(String),
    Groups(IndexMap<String, String>),
}

// Older documents stored a single theme id (or null) instead of a per-group map.
impl<'de> Deserialize<'de> for ActiveTheme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<ActiveThemeRepr>::deserialize(deserializer)? {
            None => ActiveTheme::new(),
            Some(ActiveThemeRepr::Legacy(id)) if id.is_empty() => ActiveTheme::new(),
            Some(ActiveThemeRepr::Legacy(id)) => ActiveTheme::single(DEFAULT_GROUP, id),
            Some(ActiveThemeRepr::Groups(groups)) => ActiveTheme(groups),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn theme_deserializes_with_defaults() {
        let theme: ThemeObject = serde_json::from_value(json!({
            "id": "light",
            "name": "Light",
            "selectedTokenSets": {},
            "$figmaStyleReferences": {}
        }))
        .unwrap();
        assert_eq!(theme.group, DEFAULT_GROUP);
        assert!(theme.selected_token_sets.is_empty());
    }

    #[test]
    fn disabled_sets_never_serialized() {
        let mut theme = ThemeObject::new("t", "T");
        theme
            .selected_token_sets
            .insert("a".into(), TokenSetStatus::Enabled);
        theme
            .selected_token_sets
            .insert("b".into(), TokenSetStatus::Disabled);
        let value = serde_json::to_value(&theme).unwrap();
        assert_eq!(value["selectedTokenSets"], json!({ "a": "enabled" }));
    }

    #[test]
    fn disabled_sets_stripped_on_load() {
        let theme: ThemeObject = serde_json::from_value(json!({
            "id": "t",
            "name": "T",
            "group": "mode",
            "selectedTokenSets": { "a": "source", "b": "disabled" }
        }))
        .unwrap();
        assert_eq!(theme.selected_token_sets.len(), 1);
        assert_eq!(theme.status_of("a"), TokenSetStatus::Source);
        assert_eq!(theme.status_of("b"), TokenSetStatus::Disabled);
    }

    #[test]
    fn style_references_keep_dollar_key() {
        let theme = ThemeObject::new("t", "T").with_style_reference("colors.red", "S:0283");
        let value = serde_json::to_value(&theme).unwrap();
        assert_eq!(value["$figmaStyleReferences"]["colors.red"], "S:0283");
    }

    #[test]
    fn active_theme_accepts_legacy_string() {
        let active: ActiveTheme = serde_json::from_value(json!("light")).unwrap();
        assert_eq!(active.get(DEFAULT_GROUP), Some("light"));

        let active: ActiveTheme = serde_json::from_value(json!(null)).unwrap();
        assert!(active.is_empty());

        let active: ActiveTheme =
            serde_json::from_value(json!({ "mode": "dark", "density": "compact" })).unwrap();
        assert_eq!(active.len(), 2);
        assert_eq!(active.get("density"), Some("compact"));
    }

    #[test]
    fn remove_id_clears_every_group() {
        let mut active: ActiveTheme = [
            ("a".to_string(), "x".to_string()),
            ("b".to_string(), "y".to_string()),
            ("c".to_string(), "x".to_string()),
        ]
        .into_iter()
        .collect();
        assert!(active.contains_id("x"));
        assert_eq!(active.remove_id("x"), vec!["a".to_string(), "c".to_string()]);
        assert!(!active.contains_id("x"));
        assert_eq!(active.len(), 1);
    }
}
