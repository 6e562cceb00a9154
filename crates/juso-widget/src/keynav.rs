//! Keyboard-driven selection over the suggestion list.
//!
//! A thin state machine over the view-state suggestion list: arrows move
//! the highlight (clamping, never wrapping), Enter commits the highlighted
//! entry, Escape discards the list. Committing is reported to the caller;
//! field mutation is the synchronizer's job.

use crate::view::ViewHandle;

/// Keys the navigator interprets while the suggestion list is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Move the highlight down
    ArrowDown,
    /// Move the highlight up
    ArrowUp,
    /// Commit the highlighted entry
    Enter,
    /// Discard the list
    Escape,
}

/// Result of a key or click interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// The key did nothing (list closed, or Enter with no highlight)
    Ignored,
    /// The highlight moved
    Highlighted,
    /// An entry was committed; the list is now closed
    Commit(String),
    /// The list was discarded without committing
    Dismissed,
}

/// Interprets keys and clicks against the current suggestion list.
#[derive(Clone)]
pub struct KeyboardNavigator {
    view: ViewHandle,
}

impl KeyboardNavigator {
    /// Create a navigator over the given view.
    #[must_use]
    pub fn new(view: ViewHandle) -> Self {
        Self { view }
    }

    /// Handle a key while the list may be open.
    ///
    /// With the list hidden or empty every key is [`NavOutcome::Ignored`];
    /// normal text input is none of the navigator's business.
    pub fn on_key(&self, key: NavKey) -> NavOutcome {
        let mut outcome = NavOutcome::Ignored;

        self.view.update(|state| {
            if !state.suggestions_visible || state.suggestions.is_empty() {
                return;
            }

            match key {
                NavKey::ArrowDown => {
                    state.suggestions.highlight_next();
                    outcome = NavOutcome::Highlighted;
                }
                NavKey::ArrowUp => {
                    state.suggestions.highlight_prev();
                    outcome = NavOutcome::Highlighted;
                }
                NavKey::Enter => {
                    if let Some(entry) = state.suggestions.highlighted_entry() {
                        let entry = entry.to_string();
                        state.suggestions.clear();
                        state.suggestions_visible = false;
                        outcome = NavOutcome::Commit(entry);
                    }
                    // No highlight: swallow the key without submitting
                }
                NavKey::Escape => {
                    state.suggestions.clear();
                    state.suggestions_visible = false;
                    outcome = NavOutcome::Dismissed;
                }
            }
        });

        outcome
    }

    /// Commit the entry at `index` (mouse click on a row), regardless of
    /// the current highlight.
    pub fn select_at(&self, index: usize) -> NavOutcome {
        let mut outcome = NavOutcome::Ignored;

        self.view.update(|state| {
            if !state.suggestions_visible {
                return;
            }

            if let Some(entry) = state.suggestions.get(index) {
                let entry = entry.to_string();
                state.suggestions.clear();
                state.suggestions_visible = false;
                outcome = NavOutcome::Commit(entry);
            }
        });

        outcome
    }
}
