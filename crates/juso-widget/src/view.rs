//! Declarative view state published to the rendering layer.
//!
//! All widget state a renderer needs lives in [`ViewState`]. Sub-components
//! mutate it only through [`ViewHandle::update`], so every transition
//! publishes exactly one new snapshot on the watch channel.

use juso_core::{Notice, SuggestionList, ValidationState};
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of everything the rendering layer draws.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Current suggestion candidates
    pub suggestions: SuggestionList,
    /// Whether the suggestion dropdown is shown
    pub suggestions_visible: bool,
    /// Whether a suggestion request is in flight
    pub loading: bool,
    /// Validation state of the address field
    pub validation: ValidationState,
    /// Active transient notices, oldest first
    pub notices: Vec<Notice>,
    /// Whether the renderer should move focus to the detail field
    pub focus_detail: bool,
}

/// Shared handle over the published view state.
#[derive(Clone)]
pub struct ViewHandle {
    tx: Arc<watch::Sender<ViewState>>,
}

impl ViewHandle {
    /// Create a handle publishing the default (empty) view state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to view-state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    /// Mutate the view state and publish the new snapshot.
    pub fn update(&self, mutate: impl FnOnce(&mut ViewState)) {
        self.tx.send_modify(mutate);
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Reset to the default (empty) view state.
    pub fn reset(&self) {
        self.tx.send_modify(|state| *state = ViewState::default());
    }
}

impl Default for ViewHandle {
    fn default() -> Self {
        Self::new()
    }
}
