//! State model for design-token themes.
//!
//! ```text
//!   Command ──▶ reduce(&TokenState) ──▶ Transition { state, effects }
//!                                              │          │
//!                                        Store keeps   analytics / host
//! ```
//!
//! Transitions are pure and never modify the state they are given; the
//! [`store::Store`] serializes them and routes their effects.

pub mod collapse;
pub mod edits;
pub mod groups;
pub mod manager;
pub mod reconcile;
pub mod reducer;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod token_store;
pub mod tree;

pub use collapse::CollapsedTokens;
pub use manager::{AutoConfirm, Confirm, EditorState, FormValues, ThemeManager};
pub use reducer::{Command, reduce};
pub use registry::SaveThemePayload;
pub use resolver::ThemeLabel;
pub use settings::Settings;
pub use snapshot::Snapshot;
pub use state::{Effect, HostUpdate, TokenState, Transition};
pub use store::{Analytics, Clock, HostBridge, MonotonicClock, Store};
pub use token_store::{TokenSetStore, TokenStoreError};
