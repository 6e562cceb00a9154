//! Juso Widget - The address-search input controller.
//!
//! A headless, framework-independent engine that drives a third-party
//! postal-code popup, debounces free-text suggestion queries, manages
//! keyboard-driven selection, synchronizes the dependent address fields,
//! performs asynchronous validation and geocoding, and surfaces transient
//! user feedback. Rendering layers subscribe to [`ViewState`] snapshots
//! and feed raw input events back into [`AddressSearch`].
//!
//! # Modules
//!
//! - [`controller`] - The composition root hosts talk to
//! - [`view`] - Declarative view state published over a watch channel
//! - [`suggest`] - Debounced suggestion engine
//! - [`keynav`] - Keyboard navigation over the suggestion list
//! - [`fields`] - Field synchronization and address snapshots
//! - [`validate`] - Blur validation and the duplicate check
//! - [`script`] - Idempotent popup-script loading
//! - [`popup`] - The host-implemented popup seam
//! - [`notify`] - Transient notices
//! - [`debounce`] - The cancellable debounce timer
//!
//! # Example
//!
//! Wiring the widget into a store-address form:
//!
//! ```no_run
//! use std::sync::Arc;
//! use juso_api::HttpAddressApi;
//! use juso_core::{PopupConfig, PopupOutcome, WidgetConfig};
//! use juso_widget::{
//!     AddressSearch, HttpScriptSource, PopupError, PostalPopup, ScriptLoader,
//! };
//!
//! /// Popup driven by the host's window system.
//! struct WebviewPopup;
//!
//! #[async_trait::async_trait]
//! impl PostalPopup for WebviewPopup {
//!     async fn open(&self, _config: &PopupConfig) -> Result<PopupOutcome, PopupError> {
//!         // Open the webview overlay and await the user...
//!         Ok(PopupOutcome::Dismissed)
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WidgetConfig::default();
//! let api = Arc::new(
//!     HttpAddressApi::new("https://admin.example.com")?.with_csrf_token("csrf-from-meta"),
//! );
//! let script = Arc::new(HttpScriptSource::new(config.popup.script_url.clone())?);
//!
//! let widget = AddressSearch::new(config, api, Arc::new(WebviewPopup), ScriptLoader::new(script))?;
//!
//! let mut view = widget.subscribe();
//!
//! // Forward keystrokes from the address input
//! widget.on_input("서울시 강남");
//!
//! // Open the postal-code popup from the search button
//! if let Some(record) = widget.open_address_search().await? {
//!     println!("selected: {}", record.full_address);
//! }
//!
//! // Render whatever the widget currently wants on screen
//! let state = view.borrow_and_update().clone();
//! println!("{} suggestions shown", state.suggestions.len());
//!
//! // Check uniqueness before saving the store form
//! let verdict = widget.check_address_duplicate("서울시 강남구 테헤란로 1", None).await;
//! if verdict.duplicate {
//!     eprintln!("{}", verdict.message);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod controller;
pub mod debounce;
pub mod fields;
pub mod keynav;
pub mod notify;
pub mod popup;
pub mod script;
pub mod suggest;
pub mod validate;
pub mod view;

// Re-export commonly used types
pub use controller::{AddressSearch, AddressSelectedHook, ErrorHook};
pub use debounce::Debouncer;
pub use fields::FieldSynchronizer;
pub use keynav::{KeyboardNavigator, NavKey, NavOutcome};
pub use notify::Notifier;
pub use popup::{PopupError, PostalPopup};
pub use script::{HttpScriptSource, ScriptLoadError, ScriptLoader, ScriptSource};
pub use suggest::SuggestionEngine;
pub use validate::ValidationGate;
pub use view::{ViewHandle, ViewState};

/// Widget configuration shared read-only with every sub-component; only
/// `AddressSearch::update_options` writes.
pub(crate) type SharedConfig = std::sync::Arc<std::sync::RwLock<juso_core::WidgetConfig>>;
