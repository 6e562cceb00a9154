//! Debounced address suggestions.
//!
//! Every keystroke reschedules the debounce timer, so at most one
//! suggestion request is pending per input burst and it carries the final
//! input value. Responses are generation-checked: a slow response for an
//! older query can never overwrite the results of a newer one.

use crate::debounce::Debouncer;
use crate::view::ViewHandle;
use crate::SharedConfig;
use juso_api::AddressApi;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Minimum trimmed query length (in chars) before a lookup is considered.
pub(crate) const MIN_QUERY_CHARS: usize = 2;

/// Debounces raw input and keeps the suggestion list current.
pub struct SuggestionEngine {
    api: Arc<dyn AddressApi>,
    config: SharedConfig,
    view: ViewHandle,
    debouncer: Debouncer,
    generation: Arc<AtomicU64>,
}

impl SuggestionEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new(api: Arc<dyn AddressApi>, config: SharedConfig, view: ViewHandle) -> Self {
        Self {
            api,
            config,
            view,
            debouncer: Debouncer::new(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Feed one raw input value (the current content of the address field).
    ///
    /// Short queries clear the list immediately without a network call;
    /// anything else (re)starts the debounce window.
    pub fn on_input(&self, raw: &str) {
        let (enabled, delay_ms, limit) = {
            let config = self.config.read().expect("acquire config read lock");
            (
                config.enable_auto_complete,
                config.debounce_delay_ms,
                config.max_suggestions,
            )
        };

        if !enabled {
            return;
        }

        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            self.debouncer.cancel();
            // Invalidate any in-flight lookup so its late response cannot
            // reopen the list.
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.view.update(|state| {
                state.suggestions.clear();
                state.suggestions_visible = false;
                state.loading = false;
            });
            return;
        }

        let query = trimmed.to_string();
        let api = Arc::clone(&self.api);
        let view = self.view.clone();
        let latest = Arc::clone(&self.generation);

        self.debouncer
            .schedule(Duration::from_millis(delay_ms), async move {
                let generation = latest.fetch_add(1, Ordering::SeqCst) + 1;
                view.update(|state| state.loading = true);

                match api.suggest(&query, limit).await {
                    Ok(entries) if latest.load(Ordering::SeqCst) == generation => {
                        view.update(|state| {
                            state.loading = false;
                            if entries.is_empty() {
                                state.suggestions.clear();
                                state.suggestions_visible = false;
                            } else {
                                state.suggestions.replace(entries);
                                state.suggestions_visible = true;
                            }
                        });
                    }
                    Ok(_) => {
                        tracing::debug!(query, "discarding stale suggestion response");
                    }
                    Err(error) => {
                        // Suggestion failure is non-fatal; manual entry continues
                        tracing::debug!(%error, query, "address suggestion lookup failed");
                        if latest.load(Ordering::SeqCst) == generation {
                            view.update(|state| {
                                state.loading = false;
                                state.suggestions.clear();
                                state.suggestions_visible = false;
                            });
                        }
                    }
                }
            });
    }

    /// Cancel the pending lookup and invalidate in-flight responses
    /// (widget teardown).
    pub(crate) fn shutdown(&self) {
        self.debouncer.cancel();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use juso_api::{Coordinates, DuplicateVerdict, ValidationVerdict};
    use juso_core::WidgetConfig;
    use std::sync::{Mutex, RwLock};

    /// Records queries and replays canned suggestion responses, optionally
    /// delaying each response to model a slow backend.
    struct SuggestApi {
        calls: Mutex<Vec<String>>,
        responses: Mutex<Vec<Result<Vec<String>, ()>>>,
        delays: Mutex<Vec<Duration>>,
    }

    impl SuggestApi {
        fn new(responses: Vec<Result<Vec<String>, ()>>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses),
                delays: Mutex::new(Vec::new()),
            })
        }

        fn with_delays(responses: Vec<Result<Vec<String>, ()>>, delays: Vec<Duration>) -> Arc<Self> {
            let api = Self::new(responses);
            *api.delays.lock().expect("lock delays") = delays;
            api
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock calls").clone()
        }
    }

    #[async_trait]
    impl AddressApi for SuggestApi {
        async fn suggest(&self, query: &str, _limit: usize) -> juso_api::Result<Vec<String>> {
            self.calls.lock().expect("lock calls").push(query.to_string());

            let delay = {
                let mut delays = self.delays.lock().expect("lock delays");
                if delays.is_empty() {
                    Duration::ZERO
                } else {
                    delays.remove(0)
                }
            };
            // Bind the canned response to call order at call-time, so a fast
            // later request cannot steal an earlier (slow) request's response.
            let response = {
                let mut responses = self.responses.lock().expect("lock responses");
                if responses.is_empty() {
                    Ok(Vec::new())
                } else {
                    responses.remove(0)
                }
            };
            if delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }
            response.map_err(|()| juso_api::ApiError::Rejected {
                endpoint: "/api/admin/address-suggestions".to_string(),
                message: "backend unavailable".to_string(),
            })
        }

        async fn validate(&self, _address: &str) -> juso_api::Result<ValidationVerdict> {
            unreachable!("validation not exercised here")
        }

        async fn geocode(&self, _address: &str) -> juso_api::Result<Coordinates> {
            unreachable!("geocoding not exercised here")
        }

        async fn check_duplicate(
            &self,
            _address: &str,
            _exclude_id: Option<&str>,
        ) -> juso_api::Result<DuplicateVerdict> {
            unreachable!("duplicate check not exercised here")
        }
    }

    fn build_engine(api: Arc<SuggestApi>) -> (SuggestionEngine, ViewHandle) {
        let view = ViewHandle::new();
        let config = Arc::new(RwLock::new(WidgetConfig::default()));
        let engine = SuggestionEngine::new(api as Arc<dyn AddressApi>, config, view.clone());
        (engine, view)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(400)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_never_queries() {
        let api = SuggestApi::new(vec![]);
        let (engine, view) = build_engine(Arc::clone(&api));

        for raw in ["", " ", "서", "  강  "] {
            engine.on_input(raw);
        }
        settle().await;

        assert!(api.calls().is_empty());
        assert!(!view.snapshot().suggestions_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_single_request_with_final_value() {
        let api = SuggestApi::new(vec![Ok(vec!["서울시 강남구".to_string()])]);
        let (engine, view) = build_engine(Arc::clone(&api));

        engine.on_input("서울");
        engine.on_input("서울시");
        engine.on_input("서울시 강남");
        settle().await;

        assert_eq!(api.calls(), ["서울시 강남"]);
        let snapshot = view.snapshot();
        assert!(snapshot.suggestions_visible);
        assert_eq!(snapshot.suggestions.entries(), ["서울시 강남구".to_string()]);
        assert_eq!(snapshot.suggestions.highlighted(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_inputs_each_fire() {
        let api = SuggestApi::new(vec![Ok(vec!["a".to_string()]), Ok(vec!["b".to_string()])]);
        let (engine, _view) = build_engine(Arc::clone(&api));

        engine.on_input("서울");
        settle().await;
        engine.on_input("부산");
        settle().await;

        assert_eq!(api.calls(), ["서울", "부산"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_hides_list() {
        let api = SuggestApi::new(vec![Ok(vec![])]);
        let (engine, view) = build_engine(Arc::clone(&api));

        engine.on_input("없는주소");
        settle().await;

        let snapshot = view.snapshot();
        assert!(!snapshot.suggestions_visible);
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_degrades_silently() {
        let api = SuggestApi::new(vec![Err(())]);
        let (engine, view) = build_engine(Arc::clone(&api));

        engine.on_input("서울시");
        settle().await;

        let snapshot = view.snapshot();
        assert!(!snapshot.suggestions_visible);
        assert!(!snapshot.loading);
        assert!(snapshot.suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_clears_open_list() {
        let api = SuggestApi::new(vec![Ok(vec!["서울시 강남구".to_string()])]);
        let (engine, view) = build_engine(Arc::clone(&api));

        engine.on_input("서울시");
        settle().await;
        assert!(view.snapshot().suggestions_visible);

        engine.on_input("서");
        assert!(!view.snapshot().suggestions_visible);
        assert!(view.snapshot().suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_never_overwrites_newer_result() {
        // First lookup answers slowly with "old", second quickly with "new".
        let api = SuggestApi::with_delays(
            vec![
                Ok(vec!["old".to_string()]),
                Ok(vec!["new".to_string()]),
            ],
            vec![Duration::from_millis(500), Duration::ZERO],
        );
        let (engine, view) = build_engine(Arc::clone(&api));

        engine.on_input("첫번째");
        // Let the first request fire and start waiting on its slow response
        tokio::time::sleep(Duration::from_millis(310)).await;

        engine.on_input("두번째");
        settle().await;

        assert_eq!(api.calls(), ["첫번째", "두번째"]);
        let snapshot = view.snapshot();
        assert!(snapshot.suggestions_visible);
        assert_eq!(snapshot.suggestions.entries(), ["new".to_string()]);

        // The slow response eventually arrives and is discarded
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(view.snapshot().suggestions.entries(), ["new".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_autocomplete_never_queries() {
        let api = SuggestApi::new(vec![Ok(vec!["a".to_string()])]);
        let view = ViewHandle::new();
        let mut config = WidgetConfig::default();
        config.enable_auto_complete = false;
        let engine = SuggestionEngine::new(
            Arc::clone(&api) as Arc<dyn AddressApi>,
            Arc::new(RwLock::new(config)),
            view.clone(),
        );

        engine.on_input("서울시 강남구");
        settle().await;

        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_lookup() {
        let api = SuggestApi::new(vec![Ok(vec!["a".to_string()])]);
        let (engine, _view) = build_engine(Arc::clone(&api));

        engine.on_input("서울시");
        engine.shutdown();
        settle().await;

        assert!(api.calls().is_empty());
    }
}
