//! The postal-code popup seam.
//!
//! The widget never draws the popup itself; the embedding host implements
//! [`PostalPopup`] over its window system and the engine awaits the typed
//! outcome.

use async_trait::async_trait;
use juso_core::{PopupConfig, PopupOutcome};
use thiserror::Error;

/// Errors raised by a popup session.
///
/// A user closing the popup is not an error; that is
/// [`PopupOutcome::Dismissed`].
#[derive(Error, Debug)]
pub enum PopupError {
    /// The popup could not be opened or crashed mid-search
    #[error("postal-code popup failed: {0}")]
    Failed(String),
}

/// Host-implemented postal-code popup.
#[async_trait]
pub trait PostalPopup: Send + Sync {
    /// Open the popup and wait for the user to pick an address or close it.
    ///
    /// # Errors
    /// Returns error if the popup cannot be opened or fails mid-search.
    async fn open(&self, config: &PopupConfig) -> Result<PopupOutcome, PopupError>;
}
