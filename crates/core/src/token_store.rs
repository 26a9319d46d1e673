use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use token_themes_protocol::{Token, TokenGroup, TokenNode, TokenSet, TokenType, join_path};

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("unknown token set `{0}`")]
    UnknownSet(String),
    #[error("token set `{0}` already exists")]
    SetExists(String),
    #[error("no token or group at `{0}`")]
    PathNotFound(String),
    #[error("`{0}` is already taken")]
    PathOccupied(String),
    #[error("invalid token path `{0}`")]
    InvalidPath(String),
    #[error("`{path}` is neither a token nor a group")]
    InvalidNode { path: String },
    #[error("`{path}` has an invalid token type: {source}")]
    InvalidTokenType {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Token sets by name, in the order the user arranged them.
///
/// Sets are individually reference-counted so an edit to one set leaves the
/// others shared with previous snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSetStore {
    sets: IndexMap<String, Arc<TokenSet>>,
}

impl TokenSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenSet)> {
        self.sets.iter().map(|(name, set)| (name.as_str(), set.as_ref()))
    }

    pub fn get(&self, name: &str) -> Option<&TokenSet> {
        self.sets.get(name).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Replace a set in place, or append it when the name is new.
    pub fn insert_set(&mut self, name: impl Into<String>, set: TokenSet) {
        self.sets.insert(name.into(), Arc::new(set));
    }

    pub fn remove_set(&mut self, name: &str) -> Result<(), TokenStoreError> {
        self.sets
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| TokenStoreError::UnknownSet(name.to_string()))
    }

    /// Rename a set, keeping its position.
    pub fn rename_set(&mut self, from: &str, to: &str) -> Result<(), TokenStoreError> {
        if from == to {
            return if self.contains(from) {
                Ok(())
            } else {
                Err(TokenStoreError::UnknownSet(from.to_string()))
            };
        }
        if self.contains(to) {
            return Err(TokenStoreError::SetExists(to.to_string()));
        }
        let (index, _, set) = self
            .sets
            .shift_remove_full(from)
            .ok_or_else(|| TokenStoreError::UnknownSet(from.to_string()))?;
        self.sets.shift_insert(index, to.to_string(), set);
        Ok(())
    }

    /// Insert or replace a token at the path given by its name.
    pub fn upsert_token(&mut self, set_name: &str, token: Token) -> Result<(), TokenStoreError> {
        self.edit(set_name, |set| {
            let path = token.name.clone();
            let segments = split_path(&path)?;
            insert_at(&mut set.root, &segments, &path, TokenNode::Token(token))
        })
    }

    pub fn remove_token(
        &mut self,
        set_name: &str,
        path: &str,
    ) -> Result<TokenNode, TokenStoreError> {
        self.edit(set_name, |set| {
            let segments = split_path(path)?;
            remove_at(&mut set.root, &segments)
                .ok_or_else(|| TokenStoreError::PathNotFound(path.to_string()))
        })
    }

    /// Move a token or a whole group to a new path. Token names below the
    /// moved node are rewritten to match.
    pub fn rename_path(
        &mut self,
        set_name: &str,
        from: &str,
        to: &str,
    ) -> Result<(), TokenStoreError> {
        if from == to {
            return Ok(());
        }
        if is_within(from, to) {
            return Err(TokenStoreError::InvalidPath(to.to_string()));
        }
        self.edit(set_name, |set| {
            let from_segments = split_path(from)?;
            let to_segments = split_path(to)?;
            if set.get(to).is_some() {
                return Err(TokenStoreError::PathOccupied(to.to_string()));
            }
            let mut node = remove_at(&mut set.root, &from_segments)
                .ok_or_else(|| TokenStoreError::PathNotFound(from.to_string()))?;
            rename_tokens(&mut node, to);
            insert_at(&mut set.root, &to_segments, to, node)
        })
    }

    // Edits run on a copy, so a failed edit leaves the stored set untouched.
    fn edit<T>(
        &mut self,
        set_name: &str,
        f: impl FnOnce(&mut TokenSet) -> Result<T, TokenStoreError>,
    ) -> Result<T, TokenStoreError> {
        let slot = self
            .sets
            .get_mut(set_name)
            .ok_or_else(|| TokenStoreError::UnknownSet(set_name.to_string()))?;
        let mut edited = TokenSet::clone(slot);
        let out = f(&mut edited)?;
        *slot = Arc::new(edited);
        Ok(out)
    }
}

/// Whether `path` equals `prefix` or lies below it on a segment boundary.
pub fn is_within(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Rewrite `path` from below `from` to below `to`. Paths outside `from` are
/// returned as `None`.
pub fn rebase_path(path: &str, from: &str, to: &str) -> Option<String> {
    if !is_within(from, path) {
        return None;
    }
    Some(format!("{to}{}", &path[from.len()..]))
}

fn split_path(path: &str) -> Result<Vec<&str>, TokenStoreError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(TokenStoreError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

fn insert_at(
    group: &mut TokenGroup,
    segments: &[&str],
    path: &str,
    node: TokenNode,
) -> Result<(), TokenStoreError> {
    let Some((last, parents)) = segments.split_last() else {
        return Err(TokenStoreError::InvalidPath(path.to_string()));
    };
    let mut current = group;
    for segment in parents {
        let child = current
            .children
            .entry((*segment).to_string())
            .or_insert_with(|| TokenNode::Group(TokenGroup::new()));
        current = match child {
            TokenNode::Group(g) => g,
            TokenNode::Token(_) => return Err(TokenStoreError::PathOccupied(path.to_string())),
        };
    }
    // Only a token may replace a token; groups are never overwritten.
    let occupied = current
        .children
        .get(*last)
        .is_some_and(|existing| existing.is_group() || node.is_group());
    if occupied {
        return Err(TokenStoreError::PathOccupied(path.to_string()));
    }
    current.children.insert((*last).to_string(), node);
    Ok(())
}

fn remove_at(group: &mut TokenGroup, segments: &[&str]) -> Option<TokenNode> {
    let (last, parents) = segments.split_last()?;
    let mut current = group;
    for segment in parents {
        current = match current.children.get_mut(*segment)? {
            TokenNode::Group(g) => g,
            TokenNode::Token(_) => return None,
        };
    }
    current.children.shift_remove(*last)
}

fn rename_tokens(node: &mut TokenNode, path: &str) {
    match node {
        TokenNode::Token(token) => token.name = path.to_string(),
        TokenNode::Group(group) => {
            for (name, child) in group.children.iter_mut() {
                rename_tokens(child, &join_path(Some(path), name));
            }
        }
    }
}

/// Build a token set from the host's nested JSON, where any object carrying
/// a `value` key is a token and every other object is a group.
pub fn token_set_from_deep_json(value: &serde_json::Value) -> Result<TokenSet, TokenStoreError> {
    let mut set = TokenSet::new();
    set.root = group_from_json(value, None)?;
    Ok(set)
}

fn group_from_json(
    value: &serde_json::Value,
    path: Option<&str>,
) -> Result<TokenGroup, TokenStoreError> {
    let Some(object) = value.as_object() else {
        return Err(TokenStoreError::InvalidNode {
            path: path.unwrap_or_default().to_string(),
        });
    };
    let mut group = TokenGroup::new();
    for (name, child) in object {
        let child_path = join_path(path, name);
        let node = match child.as_object() {
            Some(fields) if fields.contains_key("value") => {
                TokenNode::Token(token_from_json(fields, &child_path)?)
            }
            Some(_) => TokenNode::Group(group_from_json(child, Some(&child_path))?),
            None => return Err(TokenStoreError::InvalidNode { path: child_path }),
        };
        group.children.insert(name.clone(), node);
    }
    Ok(group)
}

fn token_from_json(
    fields: &serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<Token, TokenStoreError> {
    let token_type = match fields.get("type") {
        Some(raw) => serde_json::from_value::<TokenType>(raw.clone()).map_err(|source| {
            TokenStoreError::InvalidTokenType {
                path: path.to_string(),
                source,
            }
        })?,
        None => TokenType::Other,
    };
    Ok(Token {
        name: path.to_string(),
        token_type,
        value: fields.get("value").cloned().unwrap_or_default(),
        description: fields
            .get("description")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        raw_value: fields.get("rawValue").cloned(),
    })
}
