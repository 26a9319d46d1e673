pub mod status;
pub mod theme;
pub mod token;

pub use status::{TokenSetStatus, UsedTokenSet};
pub use theme::{
    ActiveTheme, DEFAULT_GROUP, SelectedTokenSets, StyleReferences, ThemeObject, strip_disabled,
};
pub use token::{Token, TokenGroup, TokenNode, TokenSet, TokenType, join_path};
