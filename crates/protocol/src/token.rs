use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of design value a token carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Implicit,
    BorderRadius,
    Sizing,
    Spacing,
    Text,
    Typography,
    Opacity,
    BorderWidth,
    BoxShadow,
    FontFamilies,
    FontWeights,
    LineHeights,
    FontSizes,
    LetterSpacing,
    ParagraphSpacing,
    TextDecoration,
    TextCase,
    Composition,
    Dimension,
    Border,
    Asset,
    Other,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenType::Color => "color",
            TokenType::Implicit => "implicit",
            TokenType::BorderRadius => "borderRadius",
            TokenType::Sizing => "sizing",
            TokenType::Spacing => "spacing",
            TokenType::Text => "text",
            TokenType::Typography => "typography",
            TokenType::Opacity => "opacity",
            TokenType::BorderWidth => "borderWidth",
            TokenType::BoxShadow => "boxShadow",
            TokenType::FontFamilies => "fontFamilies",
            TokenType::FontWeights => "fontWeights",
            TokenType::LineHeights => "lineHeights",
            TokenType::FontSizes => "fontSizes",
            TokenType::LetterSpacing => "letterSpacing",
            TokenType::ParagraphSpacing => "paragraphSpacing",
            TokenType::TextDecoration => "textDecoration",
            TokenType::TextCase => "textCase",
            TokenType::Composition => "composition",
            TokenType::Dimension => "dimension",
            TokenType::Border => "border",
            TokenType::Asset => "asset",
            TokenType::Other => "other",
        };
        f.write_str(name)
    }
}

/// A single named design value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Full dot-path, unique within its token set.
    pub name: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<serde_json::Value>,
}

impl Token {
    pub fn new(
        name: impl Into<String>,
        token_type: TokenType,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            token_type,
            value: value.into(),
            description: None,
            raw_value: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A node of a token set tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TokenNode {
    Token(Token),
    Group(TokenGroup),
}

impl TokenNode {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            TokenNode::Token(token) => Some(token),
            TokenNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&TokenGroup> {
        match self {
            TokenNode::Group(group) => Some(group),
            TokenNode::Token(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, TokenNode::Group(_))
    }
}

/// Ordered children of a group, keyed by their (single-segment) name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenGroup {
    pub children: IndexMap<String, TokenNode>,
}

impl TokenGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A named set's token tree. The root is an unnamed group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSet {
    pub root: TokenGroup,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node by dot-path.
    pub fn get(&self, path: &str) -> Option<&TokenNode> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut node = self.root.children.get(first)?;
        for segment in segments {
            node = node.as_group()?.children.get(segment)?;
        }
        Some(node)
    }

    pub fn token(&self, path: &str) -> Option<&Token> {
        self.get(path).and_then(TokenNode::as_token)
    }

    /// Every token with its dot-path, depth-first in tree order.
    pub fn tokens(&self) -> Vec<(String, &Token)> {
        let mut out = Vec::new();
        collect_tokens(&self.root, None, &mut out);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn collect_tokens<'a>(
    group: &'a TokenGroup,
    prefix: Option<&str>,
    out: &mut Vec<(String, &'a Token)>,
) {
    for (name, node) in &group.children {
        let path = join_path(prefix, name);
        match node {
            TokenNode::Token(token) => out.push((path, token)),
            TokenNode::Group(child) => collect_tokens(child, Some(&path), out),
        }
    }
}

/// Join a parent dot-path and a child name.
pub fn join_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}.{name}"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TokenSet {
        let mut font = TokenGroup::new();
        font.children.insert(
            "small".into(),
            TokenNode::Token(Token::new("size.font.small", TokenType::Sizing, "10")),
        );
        let mut size = TokenGroup::new();
        size.children.insert(
            "1".into(),
            TokenNode::Token(Token::new("size.1", TokenType::Sizing, "1")),
        );
        size.children.insert("font".into(), TokenNode::Group(font));
        let mut set = TokenSet::new();
        set.root.children.insert("size".into(), TokenNode::Group(size));
        set
    }

    #[test]
    fn get_walks_segments() {
        let set = sample();
        assert!(set.get("size").is_some_and(TokenNode::is_group));
        assert_eq!(set.token("size.font.small").map(|t| t.value.clone()), Some(json!("10")));
        assert!(set.get("size.font.small.x").is_none());
        assert!(set.get("sizefont").is_none());
    }

    #[test]
    fn tokens_in_tree_order() {
        let set = sample();
        let paths: Vec<String> = set.tokens().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["size.1", "size.font.small"]);
    }

    #[test]
    fn nodes_carry_explicit_tag() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["children"]["size"]["kind"], "group");
        assert_eq!(value["children"]["size"]["children"]["1"]["kind"], "token");
        assert_eq!(value["children"]["size"]["children"]["1"]["type"], "sizing");
        let back: TokenSet = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn description_is_written_only_when_set() {
        let plain = serde_json::to_value(Token::new("space.sm", TokenType::Spacing, "4")).unwrap();
        assert!(plain.get("description").is_none());

        let described =
            Token::new("space.sm", TokenType::Spacing, "4").with_description("Small gap");
        let value = serde_json::to_value(&described).unwrap();
        assert_eq!(value["description"], "Small gap");
        assert_eq!(serde_json::from_value::<Token>(value).unwrap(), described);
    }

    #[test]
    fn join_path_skips_empty_parent() {
        assert_eq!(join_path(None, "color"), "color");
        assert_eq!(join_path(Some(""), "color"), "color");
        assert_eq!(join_path(Some("size"), "font"), "size.font");
    }
}
