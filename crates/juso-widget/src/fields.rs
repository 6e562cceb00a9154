//! Field synchronization and the address snapshot.
//!
//! The synchronizer owns the shared field store and keeps the dependent
//! fields consistent whenever a selection is committed or the detail field
//! changes. Geocoding is best-effort and never blocks address entry.

use crate::view::ViewHandle;
use crate::SharedConfig;
use juso_api::AddressApi;
use juso_core::{AddressRecord, FieldKey, PopupSelection, ValidationState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;

/// Shared live values of the synchronized fields.
pub(crate) type FieldStore = Arc<RwLock<HashMap<FieldKey, String>>>;

/// Keeps the bound fields consistent and snapshots them on demand.
#[derive(Clone)]
pub struct FieldSynchronizer {
    store: FieldStore,
    api: Arc<dyn AddressApi>,
    config: SharedConfig,
    view: ViewHandle,
    cancel: CancellationToken,
    geocode_generation: Arc<AtomicU64>,
}

impl FieldSynchronizer {
    /// Create a synchronizer with every field empty.
    #[must_use]
    pub fn new(
        api: Arc<dyn AddressApi>,
        config: SharedConfig,
        view: ViewHandle,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            api,
            config,
            view,
            cancel,
            geocode_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Apply a popup selection: fill zipcode/road/jibun, write the base
    /// address into the combined field, recompute the full address, ask
    /// the renderer to focus the detail field, and kick off best-effort
    /// geocoding.
    pub fn apply_selection(&self, selection: &PopupSelection) {
        let base = selection.base_address().to_string();

        {
            let mut fields = self.store.write().expect("acquire field store write lock");
            fields.insert(FieldKey::Zipcode, selection.zonecode.clone());
            fields.insert(FieldKey::RoadAddress, selection.road_address.clone());
            fields.insert(FieldKey::JibunAddress, selection.jibun_address.clone());
            fields.insert(FieldKey::Address, base.clone());
        }
        self.recompute_full_address();

        self.view.update(|state| {
            state.suggestions.clear();
            state.suggestions_visible = false;
            state.focus_detail = true;
        });

        self.spawn_geocode(base);
    }

    /// Apply a committed free-text suggestion: only the combined address
    /// field is populated; zipcode/road/jibun stay as they are.
    pub fn apply_suggestion(&self, text: &str) {
        {
            let mut fields = self.store.write().expect("acquire field store write lock");
            fields.insert(FieldKey::Address, text.to_string());
        }

        self.spawn_geocode(text.to_string());
    }

    /// Set a single field value. Detail edits recompute the combined
    /// address.
    pub fn set(&self, key: FieldKey, value: impl Into<String>) {
        {
            let mut fields = self.store.write().expect("acquire field store write lock");
            fields.insert(key, value.into());
        }

        if key == FieldKey::DetailAddress {
            self.recompute_full_address();
        }
    }

    /// Current value of a single field.
    #[must_use]
    pub fn get(&self, key: FieldKey) -> String {
        self.store
            .read()
            .expect("acquire field store read lock")
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    /// Recompute the combined address from base (road preferred, jibun
    /// fallback) and detail. Never touches zipcode/road/jibun, and leaves
    /// the combined field alone when no base address is known (a committed
    /// free-text suggestion keeps its text).
    pub fn on_detail_changed(&self) {
        self.recompute_full_address();
    }

    /// Reset every field, hide the suggestion list, and clear validation.
    pub fn clear(&self) {
        // Invalidate any in-flight geocode so it cannot repopulate
        // coordinates after the reset.
        self.geocode_generation.fetch_add(1, Ordering::SeqCst);

        {
            let mut fields = self.store.write().expect("acquire field store write lock");
            for key in FieldKey::ALL {
                fields.insert(key, String::new());
            }
        }

        self.view.update(|state| {
            state.suggestions.clear();
            state.suggestions_visible = false;
            state.validation = ValidationState::default();
            state.focus_detail = false;
        });
    }

    /// Snapshot the live field values.
    ///
    /// Always reads the store; nothing is cached, so the snapshot reflects
    /// the latest edits.
    #[must_use]
    pub fn read(&self) -> AddressRecord {
        let fields = self.store.read().expect("acquire field store read lock");
        let value = |key: FieldKey| fields.get(&key).cloned().unwrap_or_default();

        AddressRecord {
            zipcode: value(FieldKey::Zipcode),
            road_address: value(FieldKey::RoadAddress),
            jibun_address: value(FieldKey::JibunAddress),
            detail_address: value(FieldKey::DetailAddress),
            full_address: value(FieldKey::Address),
            latitude: value(FieldKey::Latitude),
            longitude: value(FieldKey::Longitude),
        }
    }

    /// Invalidate in-flight geocode responses (widget teardown).
    pub(crate) fn invalidate_geocode(&self) {
        self.geocode_generation.fetch_add(1, Ordering::SeqCst);
    }

    fn recompute_full_address(&self) {
        let mut fields = self.store.write().expect("acquire field store write lock");

        let road = fields.get(&FieldKey::RoadAddress).cloned().unwrap_or_default();
        let jibun = fields
            .get(&FieldKey::JibunAddress)
            .cloned()
            .unwrap_or_default();
        let detail = fields
            .get(&FieldKey::DetailAddress)
            .cloned()
            .unwrap_or_default();

        let base = if road.is_empty() { jibun } else { road };
        if base.is_empty() {
            return;
        }

        let full = if detail.is_empty() {
            base
        } else {
            format!("{base} {detail}")
        };
        fields.insert(FieldKey::Address, full);
    }

    /// Fire-and-forget geocoding of the given address. Failures are logged
    /// and ignored; stale responses are discarded by generation.
    fn spawn_geocode(&self, address: String) {
        let enabled = {
            self.config
                .read()
                .expect("acquire config read lock")
                .enable_coordinates
        };
        if !enabled || address.is_empty() {
            return;
        }

        let generation = self.geocode_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let latest = Arc::clone(&self.geocode_generation);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                result = api.geocode(&address) => match result {
                    Ok(coords) if latest.load(Ordering::SeqCst) == generation => {
                        let mut fields = store.write().expect("acquire field store write lock");
                        fields.insert(FieldKey::Latitude, coords.latitude.to_string());
                        fields.insert(FieldKey::Longitude, coords.longitude.to_string());
                    }
                    Ok(_) => {
                        tracing::debug!(address, "discarding stale geocode response");
                    }
                    Err(error) => {
                        tracing::debug!(%error, address, "geocoding failed; coordinates left empty");
                    }
                }
            }
        });
    }
}
