use serde::{Deserialize, Serialize};

use crate::token_store::{is_within, rebase_path};

/// Dot-paths of the token groups collapsed in the tree, in the order they
/// were collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapsedTokens(Vec<String>);

impl CollapsedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }

    /// Collapse `path`, or expand it if it is already collapsed.
    pub fn toggle(&mut self, path: &str) {
        if self.is_collapsed(path) {
            self.0.retain(|p| p != path);
        } else {
            self.0.push(path.to_string());
        }
    }

    /// A path is visible unless one of its strict ancestors is collapsed.
    /// Ancestors are matched on whole segments, so `size.font` never hides
    /// `size.fontsmall` or `sizefontsmall`.
    pub fn is_visible(&self, path: &str) -> bool {
        !self
            .0
            .iter()
            .any(|collapsed| collapsed != path && is_within(collapsed, path))
    }

    /// Follow a group or token that moved from `from` to `to`.
    pub fn rebase(&mut self, from: &str, to: &str) -> bool {
        let mut changed = false;
        for path in &mut self.0 {
            if let Some(moved) = rebase_path(path, from, to) {
                *path = moved;
                changed = true;
            }
        }
        if changed {
            let mut seen = Vec::with_capacity(self.0.len());
            self.0.retain(|p| {
                if seen.contains(p) {
                    false
                } else {
                    seen.push(p.clone());
                    true
                }
            });
        }
        changed
    }

    pub fn paths(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for CollapsedTokens {
    fn from(paths: Vec<String>) -> Self {
        let mut collapsed = Self::new();
        for path in paths {
            if !collapsed.is_collapsed(&path) {
                collapsed.0.push(path);
            }
        }
        collapsed
    }
}
