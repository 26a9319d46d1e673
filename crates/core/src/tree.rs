use token_themes_protocol::{TokenGroup, TokenNode, TokenSet, TokenType, join_path};

use crate::collapse::CollapsedTokens;

/// What a tree row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Group { collapsed: bool },
    Token { token_type: TokenType },
}

/// A visible row of the token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub path: String,
    pub name: String,
    /// Dot-path of the enclosing group, empty at the top level.
    pub parent: String,
    pub depth: usize,
    pub kind: RowKind,
}

impl TreeRow {
    /// Name prefilled in the "new token" form opened from a group row.
    pub fn new_token_prefix(&self) -> String {
        format!("{}.", self.path)
    }
}

/// Flatten `set` top-down into the rows currently visible.
///
/// Computed fresh on every call; collapse state and the tree can both
/// change between renders.
pub fn visible_rows(set: &TokenSet, collapsed: &CollapsedTokens) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    walk(&set.root, None, 0, collapsed, &mut rows);
    rows
}

fn walk(
    group: &TokenGroup,
    parent: Option<&str>,
    depth: usize,
    collapsed: &CollapsedTokens,
    rows: &mut Vec<TreeRow>,
) {
    for (name, node) in &group.children {
        let path = join_path(parent, name);
        if !collapsed.is_visible(&path) {
            continue;
        }
        let kind = match node {
            TokenNode::Group(_) => RowKind::Group {
                collapsed: collapsed.is_collapsed(&path),
            },
            TokenNode::Token(token) => RowKind::Token {
                token_type: token.token_type,
            },
        };
        rows.push(TreeRow {
            path: path.clone(),
            name: name.clone(),
            parent: parent.unwrap_or_default().to_string(),
            depth,
            kind,
        });
        if let TokenNode::Group(child) = node {
            if !collapsed.is_collapsed(&path) {
                walk(child, Some(&path), depth + 1, collapsed, rows);
            }
        }
    }
}
