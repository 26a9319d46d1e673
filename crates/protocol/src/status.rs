use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a token set participates in a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSetStatus {
    /// Tokens are applied and exported.
    Enabled,
    /// Not part of the theme. Never stored inside a theme; absence means disabled.
    #[default]
    Disabled,
    /// Tokens are available for references but not applied themselves.
    Source,
}

impl TokenSetStatus {
    pub fn is_disabled(self) -> bool {
        self == TokenSetStatus::Disabled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenSetStatus::Enabled => "enabled",
            TokenSetStatus::Disabled => "disabled",
            TokenSetStatus::Source => "source",
        }
    }
}

impl std::fmt::Display for TokenSetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective status of every known token set, derived from the active themes.
pub type UsedTokenSet = IndexMap<String, TokenSetStatus>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TokenSetStatus::Source).unwrap();
        assert_eq!(json, "\"source\"");
        let status: TokenSetStatus = serde_json::from_str("\"enabled\"").unwrap();
        assert_eq!(status, TokenSetStatus::Enabled);
    }

    #[test]
    fn default_is_disabled() {
        assert!(TokenSetStatus::default().is_disabled());
        assert!(!TokenSetStatus::Enabled.is_disabled());
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(TokenSetStatus::Source.to_string(), "source");
    }
}
