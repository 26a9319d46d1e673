use std::cell::Cell;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::reducer::{Command, reduce};
use crate::state::{Effect, HostUpdate, TokenState};

/// Source of the timestamps that seed new theme ids.
pub trait Clock {
    fn now_millis(&self) -> u64;
}

/// Wall-clock milliseconds, forced to increase by at least one per call so
/// two creates in the same millisecond still hash differently.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Cell<u64>,
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        let now = wall.max(self.last.get().saturating_add(1));
        self.last.set(now);
        now
    }
}

/// Fire-and-forget usage tracking.
pub trait Analytics {
    fn track(&self, event: &str, payload: &serde_json::Value);
}

/// Receives style updates for the host document.
pub trait HostBridge {
    fn apply(&self, update: &HostUpdate);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

impl Analytics for NoopAnalytics {
    fn track(&self, event: &str, _payload: &serde_json::Value) {
        tracing::trace!(event, "track");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl HostBridge for NoopHost {
    fn apply(&self, update: &HostUpdate) {
        tracing::trace!(sets = update.used_token_set.len(), "host update dropped");
    }
}

/// Owns the current state and serializes every transition through
/// [`reduce`]. Previous states are kept, unmodified, for undo.
pub struct Store {
    state: TokenState,
    history: VecDeque<TokenState>,
    history_limit: usize,
    clock: Box<dyn Clock>,
    analytics: Box<dyn Analytics>,
    host: Box<dyn HostBridge>,
}

impl Store {
    pub fn new(state: TokenState) -> Self {
        Self {
            state,
            history: VecDeque::new(),
            history_limit: crate::settings::DEFAULT_HISTORY_LIMIT,
            clock: Box::new(MonotonicClock::default()),
            analytics: Box::new(NoopAnalytics),
            host: Box::new(NoopHost),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_analytics(mut self, analytics: impl Analytics + 'static) -> Self {
        self.analytics = Box::new(analytics);
        self
    }

    pub fn with_host(mut self, host: impl HostBridge + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// Older states, most recent last.
    pub fn history(&self) -> impl Iterator<Item = &TokenState> {
        self.history.iter()
    }

    /// Run one command to completion and perform its effects.
    pub fn dispatch(&mut self, command: Command) -> &TokenState {
        let name = command.name();
        let now = self.clock.now_millis();
        let transition = reduce(&self.state, command, now);
        tracing::debug!(command = name, effects = transition.effects.len(), "dispatched");

        let previous = std::mem::replace(&mut self.state, transition.state);
        self.history.push_back(previous);
        self.trim_history();

        for effect in &transition.effects {
            self.perform(effect);
        }
        &self.state
    }

    /// Fire an analytics event that is not tied to a transition.
    pub fn track(&self, event: &str, payload: serde_json::Value) {
        self.analytics.track(event, &payload);
    }

    /// Restore the previous state. Effects are not replayed.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(previous) => {
                self.state = previous;
                true
            }
            None => false,
        }
    }

    fn perform(&self, effect: &Effect) {
        match effect {
            Effect::Track { event, payload } => self.analytics.track(event, payload),
            Effect::UpdateHost(update) => self.host.apply(update),
        }
    }

    fn trim_history(&mut self) {
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}
