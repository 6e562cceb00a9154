//! Composition root for the address-search widget.
//!
//! `AddressSearch` wires the script loader, popup, suggestion engine,
//! keyboard navigator, field synchronizer, validation gate, and notifier
//! together and is the only piece embedding hosts talk to.

use crate::fields::FieldSynchronizer;
use crate::keynav::{KeyboardNavigator, NavKey, NavOutcome};
use crate::notify::Notifier;
use crate::popup::PostalPopup;
use crate::script::ScriptLoader;
use crate::suggest::SuggestionEngine;
use crate::validate::ValidationGate;
use crate::view::{ViewHandle, ViewState};
use crate::SharedConfig;
use juso_api::{AddressApi, DuplicateVerdict};
use juso_core::{
    AddressRecord, ConfigUpdate, FieldKey, JusoError, NoticeKind, PopupOutcome, Result,
    WidgetConfig,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Hook invoked when a popup selection has been applied to the fields.
pub type AddressSelectedHook = Arc<dyn Fn(&AddressRecord) + Send + Sync>;

/// Hook invoked when a failure is surfaced to the host.
pub type ErrorHook = Arc<dyn Fn(&JusoError) + Send + Sync>;

/// The address-search widget controller.
///
/// Constructed explicitly by the host, which owns the lifecycle and calls
/// [`destroy`](Self::destroy) when tearing the widget down.
pub struct AddressSearch {
    config: SharedConfig,
    popup: Arc<dyn PostalPopup>,
    script_loader: ScriptLoader,
    view: ViewHandle,
    fields: FieldSynchronizer,
    suggestions: SuggestionEngine,
    navigator: KeyboardNavigator,
    validator: ValidationGate,
    notifier: Notifier,
    cancel: CancellationToken,
    destroyed: AtomicBool,
    on_address_selected: Option<AddressSelectedHook>,
    on_error: Option<ErrorHook>,
}

impl AddressSearch {
    /// Create a widget from its collaborators.
    ///
    /// # Errors
    /// Returns error if the configuration fails validation.
    pub fn new(
        config: WidgetConfig,
        api: Arc<dyn AddressApi>,
        popup: Arc<dyn PostalPopup>,
        script_loader: ScriptLoader,
    ) -> Result<Self> {
        config.validate()?;

        let config: SharedConfig = Arc::new(RwLock::new(config));
        let view = ViewHandle::new();
        let cancel = CancellationToken::new();

        let fields = FieldSynchronizer::new(
            Arc::clone(&api),
            Arc::clone(&config),
            view.clone(),
            cancel.clone(),
        );
        let suggestions =
            SuggestionEngine::new(Arc::clone(&api), Arc::clone(&config), view.clone());
        let navigator = KeyboardNavigator::new(view.clone());
        let validator = ValidationGate::new(Arc::clone(&api), Arc::clone(&config), view.clone());
        let notifier = Notifier::new(view.clone(), cancel.clone());

        Ok(Self {
            config,
            popup,
            script_loader,
            view,
            fields,
            suggestions,
            navigator,
            validator,
            notifier,
            cancel,
            destroyed: AtomicBool::new(false),
            on_address_selected: None,
            on_error: None,
        })
    }

    /// Register a hook for applied popup selections.
    #[must_use]
    pub fn with_on_address_selected(mut self, hook: AddressSelectedHook) -> Self {
        self.on_address_selected = Some(hook);
        self
    }

    /// Register a hook for surfaced failures.
    #[must_use]
    pub fn with_on_error(mut self, hook: ErrorHook) -> Self {
        self.on_error = Some(hook);
        self
    }

    /// Subscribe to view-state snapshots for rendering.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    /// Open the postal-code popup and apply the selection, if any.
    ///
    /// Loads the popup script first; a load failure is surfaced through
    /// the error hook and returned. A dismissed popup is `Ok(None)`.
    ///
    /// # Errors
    /// Returns error if the widget is destroyed, the script cannot be
    /// loaded, or the popup fails.
    pub async fn open_address_search(&self) -> Result<Option<AddressRecord>> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(JusoError::Destroyed);
        }

        if let Err(error) = self.script_loader.load().await {
            tracing::error!(%error, "postal-code script load failed");
            let err = JusoError::ScriptLoad(error.to_string());
            self.emit_error(&err);
            return Err(err);
        }

        let popup_config = {
            self.config
                .read()
                .expect("acquire config read lock")
                .popup
                .clone()
        };

        match self.popup.open(&popup_config).await {
            Ok(PopupOutcome::Dismissed) => {
                tracing::debug!("address search popup dismissed");
                Ok(None)
            }
            Ok(PopupOutcome::Selected(selection)) => {
                self.fields.apply_selection(&selection);
                self.notifier
                    .show("주소가 입력되었습니다.", NoticeKind::Success);

                let record = self.fields.read();
                if let Some(hook) = &self.on_address_selected {
                    hook(&record);
                }
                Ok(Some(record))
            }
            Err(error) => {
                let err = JusoError::Popup(error.to_string());
                self.emit_error(&err);
                Err(err)
            }
        }
    }

    /// Feed one raw input value from the address field.
    pub fn on_input(&self, raw: &str) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        self.suggestions.on_input(raw);
    }

    /// Handle a navigation key. Commits delegate to the field
    /// synchronizer before the outcome is returned.
    pub fn on_key(&self, key: NavKey) -> NavOutcome {
        if self.destroyed.load(Ordering::SeqCst) {
            return NavOutcome::Ignored;
        }

        let outcome = self.navigator.on_key(key);
        if let NavOutcome::Commit(entry) = &outcome {
            self.fields.apply_suggestion(entry);
        }
        outcome
    }

    /// Commit the suggestion at `index` (mouse click on a row).
    pub fn select_suggestion(&self, index: usize) -> NavOutcome {
        if self.destroyed.load(Ordering::SeqCst) {
            return NavOutcome::Ignored;
        }

        let outcome = self.navigator.select_at(index);
        if let NavOutcome::Commit(entry) = &outcome {
            self.fields.apply_suggestion(entry);
        }
        outcome
    }

    /// Record a detail-field edit and recompute the combined address.
    pub fn on_detail_changed(&self, detail: &str) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        self.fields.set(FieldKey::DetailAddress, detail);
    }

    /// Set a single field value (host-side plumbing).
    pub fn set_field(&self, key: FieldKey, value: &str) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        self.fields.set(key, value);
    }

    /// Validate the address field content on blur.
    pub async fn on_blur(&self, raw: &str) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        self.validator.on_blur(raw).await;
    }

    /// Check whether another record already uses this address.
    ///
    /// Transport failures return a safe `duplicate: false` default.
    pub async fn check_address_duplicate(
        &self,
        address: &str,
        exclude_id: Option<&str>,
    ) -> DuplicateVerdict {
        self.validator.check_duplicate(address, exclude_id).await
    }

    /// Snapshot the current address record from the live fields.
    #[must_use]
    pub fn get_address_data(&self) -> AddressRecord {
        self.fields.read()
    }

    /// Reset every bound field and the widget's transient state.
    pub fn clear_address_fields(&self) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        self.suggestions.shutdown();
        self.fields.clear();
    }

    /// Shallow-merge new options into the configuration.
    ///
    /// # Errors
    /// Returns error if the merged configuration fails validation; the
    /// current configuration is left untouched in that case.
    pub fn update_options(&self, update: ConfigUpdate) -> Result<()> {
        let mut config = self.config.write().expect("acquire config write lock");

        let mut merged = config.clone();
        merged.apply_update(update);
        merged.validate()?;

        *config = merged;
        Ok(())
    }

    /// Tear the widget down.
    ///
    /// Cancels the pending debounce timer and every background task,
    /// invalidates in-flight responses, and clears view state. After
    /// `destroy` returns no timer fires and every further input is a
    /// no-op. Idempotent.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.cancel.cancel();
        self.suggestions.shutdown();
        self.fields.invalidate_geocode();
        self.view.reset();

        tracing::debug!("address search widget destroyed");
    }

    fn emit_error(&self, error: &JusoError) {
        if let Some(hook) = &self.on_error {
            hook(error);
        }
    }
}

impl Drop for AddressSearch {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juso_core::ConfigUpdate;

    use crate::script::{ScriptLoader, ScriptSource};
    use async_trait::async_trait;
    use juso_api::{Coordinates, ValidationVerdict};
    use juso_core::PopupConfig;

    struct IdleApi;

    #[async_trait]
    impl AddressApi for IdleApi {
        async fn suggest(&self, _query: &str, _limit: usize) -> juso_api::Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn validate(&self, _address: &str) -> juso_api::Result<ValidationVerdict> {
            Ok(ValidationVerdict {
                accepted: true,
                message: None,
            })
        }

        async fn geocode(&self, _address: &str) -> juso_api::Result<Coordinates> {
            Ok(Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            })
        }

        async fn check_duplicate(
            &self,
            _address: &str,
            _exclude_id: Option<&str>,
        ) -> juso_api::Result<DuplicateVerdict> {
            Ok(DuplicateVerdict {
                duplicate: false,
                message: String::new(),
            })
        }
    }

    struct IdleScript;

    #[async_trait]
    impl ScriptSource for IdleScript {
        async fn fetch(&self) -> std::result::Result<(), crate::script::ScriptLoadError> {
            Ok(())
        }
    }

    struct DismissPopup;

    #[async_trait]
    impl PostalPopup for DismissPopup {
        async fn open(
            &self,
            _config: &PopupConfig,
        ) -> std::result::Result<PopupOutcome, crate::popup::PopupError> {
            Ok(PopupOutcome::Dismissed)
        }
    }

    fn build_widget() -> AddressSearch {
        AddressSearch::new(
            WidgetConfig::default(),
            Arc::new(IdleApi),
            Arc::new(DismissPopup),
            ScriptLoader::new(Arc::new(IdleScript)),
        )
        .expect("create widget")
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let mut config = WidgetConfig::default();
        config.max_suggestions = 0;

        let result = AddressSearch::new(
            config,
            Arc::new(IdleApi),
            Arc::new(DismissPopup),
            ScriptLoader::new(Arc::new(IdleScript)),
        );
        assert!(matches!(result, Err(JusoError::Config(_))));
    }

    #[tokio::test]
    async fn test_update_options_rejects_invalid_merge() {
        let widget = build_widget();

        let result = widget.update_options(ConfigUpdate {
            debounce_delay_ms: Some(999_999),
            ..ConfigUpdate::default()
        });
        assert!(result.is_err());

        // The stored config is untouched
        let current = widget.config.read().expect("read config").clone();
        assert_eq!(current.debounce_delay_ms, 300);
    }

    #[tokio::test]
    async fn test_update_options_merges() {
        let widget = build_widget();

        widget
            .update_options(ConfigUpdate {
                debounce_delay_ms: Some(100),
                ..ConfigUpdate::default()
            })
            .expect("valid update");

        let current = widget.config.read().expect("read config").clone();
        assert_eq!(current.debounce_delay_ms, 100);
        assert_eq!(current.max_suggestions, 10);
    }

    #[tokio::test]
    async fn test_dismissed_popup_returns_none() {
        let widget = build_widget();
        let record = widget
            .open_address_search()
            .await
            .expect("popup session succeeds");
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_destroyed_widget_rejects_popup() {
        let widget = build_widget();
        widget.destroy();

        assert!(matches!(
            widget.open_address_search().await,
            Err(JusoError::Destroyed)
        ));
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let widget = build_widget();
        widget.destroy();
        widget.destroy();
    }
}
