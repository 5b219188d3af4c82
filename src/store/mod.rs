//! Client-side state layer
//!
//! - Actions: what can happen (`actions.rs`)
//! - State: what is true right now (`state.rs`)
//! - Reducer: pure `(State, Action) -> State` (`reducer.rs`)
//! - Selectors: derived views of the state (`selectors.rs`)
//! - Thunks: network operations that dispatch lifecycle actions (`thunks.rs`)

pub mod actions;
pub mod guard;
pub mod reducer;
pub mod selectors;
pub mod sort;
pub mod state;
pub mod thunks;

pub use actions::{Action, Phase};
pub use guard::{ContainerStatus, PageGuard, PageView, Recovery, Route};
pub use reducer::reduce;
pub use sort::{sort_offers, SortKind};
pub use state::AppState;
pub use thunks::FavoriteContext;

use std::sync::{RwLock, RwLockReadGuard};
use tracing::debug;

/// Owner of the application state
///
/// One instance per application, created at start-up and handed to whatever
/// needs to dispatch or select. Tests build their own isolated instances.
#[derive(Debug, Default)]
pub struct Store {
    state: RwLock<AppState>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Reduce one action into the state
    pub fn dispatch(&self, action: Action) {
        debug!(action = %action.name(), "dispatch");

        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let prior = std::mem::take(&mut *state);
        *state = reduce(prior, &action);
    }

    fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the whole state
    pub fn state(&self) -> AppState {
        self.read().clone()
    }

    /// Run a selector against the current state
    pub fn select<R>(&self, selector: impl FnOnce(&AppState) -> R) -> R {
        let state = self.read();
        selector(&*state)
    }
}
