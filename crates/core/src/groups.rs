use token_themes_protocol::{DEFAULT_GROUP, ThemeObject};

/// Named groups used by `themes`, first-seen order, without the ungrouped
/// placeholder.
pub fn group_names(themes: &[ThemeObject]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for theme in themes {
        if theme.group.is_empty() || theme.group == DEFAULT_GROUP {
            continue;
        }
        if !names.contains(&theme.group) {
            names.push(theme.group.clone());
        }
    }
    names
}

/// New group names must be non-empty and not taken (case-sensitive).
/// The model itself accepts any group string.
pub fn is_new_group_name_valid(name: &str, known: &[String]) -> bool {
    !name.is_empty() && name != DEFAULT_GROUP && !known.iter().any(|g| g == name)
}

/// One heading of the theme list.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSection<'a> {
    /// `None` for themes without a group.
    pub group: Option<&'a str>,
    pub themes: Vec<&'a ThemeObject>,
}

/// Ungrouped themes first, then one section per known group, which may be
/// empty. Themes keep their list order inside a section.
pub fn themes_by_group<'a>(
    themes: &'a [ThemeObject],
    groups: &'a [String],
) -> Vec<GroupSection<'a>> {
    let mut sections = Vec::with_capacity(groups.len() + 1);
    sections.push(GroupSection {
        group: None,
        themes: themes
            .iter()
            .filter(|theme| theme.group == DEFAULT_GROUP || theme.group.is_empty())
            .collect(),
    });
    for group in groups {
        sections.push(GroupSection {
            group: Some(group.as_str()),
            themes: themes.iter().filter(|theme| &theme.group == group).collect(),
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn themes() -> Vec<ThemeObject> {
        vec![
            ThemeObject::new("light", "Light").with_group("mode"),
            ThemeObject::new("plain", "Plain"),
            ThemeObject::new("dark", "Dark").with_group("mode"),
            ThemeObject::new("compact", "Compact").with_group("density"),
        ]
    }

    #[test]
    fn collects_distinct_group_names() {
        assert_eq!(group_names(&themes()), vec!["mode", "density"]);
    }

    #[test]
    fn validates_new_names() {
        let known = group_names(&themes());
        assert!(is_new_group_name_valid("brand", &known));
        assert!(is_new_group_name_valid("Mode", &known));
        assert!(!is_new_group_name_valid("mode", &known));
        assert!(!is_new_group_name_valid("", &known));
    }

    #[test]
    fn sections_follow_group_order() {
        let themes = themes();
        let mut groups = group_names(&themes);
        groups.push("brand".into());
        let sections = themes_by_group(&themes, &groups);

        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].group, None);
        assert_eq!(sections[0].themes[0].id, "plain");
        let mode: Vec<&str> = sections[1].themes.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(mode, vec!["light", "dark"]);
        assert_eq!(sections[3].group, Some("brand"));
        assert!(sections[3].themes.is_empty());
    }
}
