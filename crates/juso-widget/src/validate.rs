//! Blur-triggered address validation and the duplicate check.

use crate::view::ViewHandle;
use crate::SharedConfig;
use juso_api::{AddressApi, DuplicateVerdict};
use juso_core::ValidationState;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Accepted address shape: Hangul, digits, whitespace, hyphens, parens.
static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[가-힣0-9\s\-()]+$").expect("valid regex"));

/// Inline message for addresses failing the local pattern check.
pub(crate) const PATTERN_ERROR_MESSAGE: &str = "올바른 주소 형식이 아닙니다.";

/// Fallback rejection message when the server rejects without a reason.
const SERVER_REJECT_MESSAGE: &str = "유효하지 않은 주소입니다.";

/// Safe-default message when the duplicate check cannot reach the server.
pub(crate) const DUPLICATE_CHECK_FALLBACK: &str = "주소 확인 중 오류가 발생했습니다.";

/// Validates addresses on blur and exposes the uniqueness check.
#[derive(Clone)]
pub struct ValidationGate {
    api: Arc<dyn AddressApi>,
    config: SharedConfig,
    view: ViewHandle,
}

impl ValidationGate {
    /// Create a gate publishing into the given view.
    #[must_use]
    pub fn new(api: Arc<dyn AddressApi>, config: SharedConfig, view: ViewHandle) -> Self {
        Self { api, config, view }
    }

    /// Validate the address field content on blur.
    ///
    /// Empty input clears any error. A local pattern failure marks the
    /// field invalid without touching the network; only pattern-clean
    /// addresses reach the server.
    pub async fn on_blur(&self, raw: &str) {
        let enabled = {
            self.config
                .read()
                .expect("acquire config read lock")
                .enable_validation
        };
        if !enabled {
            return;
        }

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.view
                .update(|state| state.validation = ValidationState::default());
            return;
        }

        if !ADDRESS_PATTERN.is_match(trimmed) {
            self.view.update(|state| {
                state.validation = ValidationState::invalid(PATTERN_ERROR_MESSAGE);
            });
            return;
        }

        match self.api.validate(trimmed).await {
            Ok(verdict) if verdict.accepted => {
                self.view
                    .update(|state| state.validation = ValidationState::default());
            }
            Ok(verdict) => {
                let message = verdict
                    .message
                    .unwrap_or_else(|| SERVER_REJECT_MESSAGE.to_string());
                self.view
                    .update(|state| state.validation = ValidationState::invalid(message));
            }
            Err(error) => {
                // Server unreachable: the field stays unflagged
                tracing::warn!(%error, "address validation request failed");
                self.view
                    .update(|state| state.validation = ValidationState::default());
            }
        }
    }

    /// Check whether another record already uses this address.
    ///
    /// Transport failures return a safe `duplicate: false` default so
    /// callers never crash on this check. Not invoked on blur; consuming
    /// forms call it explicitly.
    pub async fn check_duplicate(
        &self,
        address: &str,
        exclude_id: Option<&str>,
    ) -> DuplicateVerdict {
        match self.api.check_duplicate(address, exclude_id).await {
            Ok(verdict) => verdict,
            Err(error) => {
                tracing::warn!(%error, "duplicate check failed; returning safe default");
                DuplicateVerdict {
                    duplicate: false,
                    message: DUPLICATE_CHECK_FALLBACK.to_string(),
                }
            }
        }
    }
}
