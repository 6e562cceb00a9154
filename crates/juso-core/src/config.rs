//! Widget configuration.
//!
//! Provides the address-search widget configuration with TOML loading,
//! environment variable overrides, and shallow-merge updates.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound for the debounce delay, in milliseconds.
const MAX_DEBOUNCE_DELAY_MS: u64 = 10_000;

/// Upper bound for the suggestion limit sent to the backend.
const MAX_SUGGESTION_LIMIT: usize = 50;

/// Address-search widget configuration.
///
/// Owned by the controller and shared read-only with every sub-component.
/// Hosts construct it programmatically, from a TOML snippet, or from a file,
/// and mutate it later only through [`ConfigUpdate`] shallow merges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Whether free-text suggestion lookups run while the user types
    pub enable_auto_complete: bool,
    /// Whether blur-triggered address validation runs
    pub enable_validation: bool,
    /// Whether selected addresses are geocoded into coordinates
    pub enable_coordinates: bool,
    /// Quiet period before a suggestion request fires, in milliseconds
    pub debounce_delay_ms: u64,
    /// Maximum number of suggestions requested from the backend
    pub max_suggestions: usize,
    /// Host element bindings for the synchronized fields
    pub fields: FieldBindings,
    /// Postal-code popup settings
    pub popup: PopupConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            enable_auto_complete: true,
            enable_validation: true,
            enable_coordinates: true,
            debounce_delay_ms: 300,
            max_suggestions: 10,
            fields: FieldBindings::default(),
            popup: PopupConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        tracing::debug!("loading widget config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Apply environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `JUSO_DEBOUNCE_MS`: Override the debounce delay
    /// - `JUSO_AUTOCOMPLETE`: Override suggestion lookups (true/false)
    /// - `JUSO_VALIDATION`: Override blur validation (true/false)
    /// - `JUSO_COORDINATES`: Override geocoding (true/false)
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("JUSO_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.debounce_delay_ms = ms;
                tracing::debug!("override debounce_delay_ms from env: {}", ms);
            }
        }

        if let Ok(val) = std::env::var("JUSO_AUTOCOMPLETE") {
            if let Ok(enabled) = val.parse() {
                self.enable_auto_complete = enabled;
                tracing::debug!("override enable_auto_complete from env: {}", enabled);
            }
        }

        if let Ok(val) = std::env::var("JUSO_VALIDATION") {
            if let Ok(enabled) = val.parse() {
                self.enable_validation = enabled;
                tracing::debug!("override enable_validation from env: {}", enabled);
            }
        }

        if let Ok(val) = std::env::var("JUSO_COORDINATES") {
            if let Ok(enabled) = val.parse() {
                self.enable_coordinates = enabled;
                tracing::debug!("override enable_coordinates from env: {}", enabled);
            }
        }

        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns error if any value is outside its accepted range or a
    /// required binding is empty.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.debounce_delay_ms > MAX_DEBOUNCE_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                field: "debounce_delay_ms".to_string(),
                reason: format!("must be at most {MAX_DEBOUNCE_DELAY_MS}"),
            });
        }

        if self.max_suggestions == 0 || self.max_suggestions > MAX_SUGGESTION_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "max_suggestions".to_string(),
                reason: format!("must be between 1 and {MAX_SUGGESTION_LIMIT}"),
            });
        }

        self.fields.validate()?;
        self.popup.validate()?;

        Ok(())
    }

    /// Shallow-merge an update into this configuration.
    ///
    /// Only fields present in the update are replaced; everything else
    /// keeps its current value.
    pub fn apply_update(&mut self, update: ConfigUpdate) {
        if let Some(enabled) = update.enable_auto_complete {
            self.enable_auto_complete = enabled;
        }
        if let Some(enabled) = update.enable_validation {
            self.enable_validation = enabled;
        }
        if let Some(enabled) = update.enable_coordinates {
            self.enable_coordinates = enabled;
        }
        if let Some(ms) = update.debounce_delay_ms {
            self.debounce_delay_ms = ms;
        }
        if let Some(limit) = update.max_suggestions {
            self.max_suggestions = limit;
        }
        if let Some(fields) = update.fields {
            self.fields = fields;
        }
        if let Some(popup) = update.popup {
            self.popup = popup;
        }
    }
}

/// Partial configuration used for shallow-merge updates.
///
/// Every field is optional; absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    /// New value for [`WidgetConfig::enable_auto_complete`]
    pub enable_auto_complete: Option<bool>,
    /// New value for [`WidgetConfig::enable_validation`]
    pub enable_validation: Option<bool>,
    /// New value for [`WidgetConfig::enable_coordinates`]
    pub enable_coordinates: Option<bool>,
    /// New value for [`WidgetConfig::debounce_delay_ms`]
    pub debounce_delay_ms: Option<u64>,
    /// New value for [`WidgetConfig::max_suggestions`]
    pub max_suggestions: Option<usize>,
    /// Replacement field bindings
    pub fields: Option<FieldBindings>,
    /// Replacement popup settings
    pub popup: Option<PopupConfig>,
}

/// Host element bindings for the synchronized fields.
///
/// These are opaque identifiers the rendering layer maps onto its own
/// widgets (DOM element IDs on the web dashboards).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldBindings {
    /// Button that opens the postal-code popup
    pub search_button: String,
    /// Combined address input (base address plus detail)
    pub address: String,
    /// Detail address input (unit, floor)
    pub detail_address: String,
    /// Postal code input
    pub zipcode: String,
    /// Road-name address input
    pub road_address: String,
    /// Lot-number (jibun) address input
    pub jibun_address: String,
    /// Latitude hidden input
    pub latitude: String,
    /// Longitude hidden input
    pub longitude: String,
    /// Auto-created suggestion dropdown container
    pub autocomplete_container: String,
}

impl Default for FieldBindings {
    fn default() -> Self {
        Self {
            search_button: "address-search-btn".to_string(),
            address: "address".to_string(),
            detail_address: "detail-address".to_string(),
            zipcode: "zipcode".to_string(),
            road_address: "road-address".to_string(),
            jibun_address: "jibun-address".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            autocomplete_container: "address-autocomplete".to_string(),
        }
    }
}

impl FieldBindings {
    fn validate(&self) -> ConfigResult<()> {
        let bindings = [
            ("search_button", &self.search_button),
            ("address", &self.address),
            ("detail_address", &self.detail_address),
            ("zipcode", &self.zipcode),
            ("road_address", &self.road_address),
            ("jibun_address", &self.jibun_address),
            ("latitude", &self.latitude),
            ("longitude", &self.longitude),
            ("autocomplete_container", &self.autocomplete_container),
        ];

        for (field, binding) in bindings {
            if binding.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: format!("fields.{field}"),
                    reason: "binding must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Postal-code popup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// URL of the third-party postal-code script
    pub script_url: String,
    /// Popup width in pixels
    pub width: u32,
    /// Popup height in pixels
    pub height: u32,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            script_url: "https://t1.daumcdn.net/mapjsapi/bundle/postcode/prod/postcode.v2.js"
                .to_string(),
            width: 500,
            height: 600,
        }
    }
}

impl PopupConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.script_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "popup.script_url".to_string(),
                reason: "script URL must not be empty".to_string(),
            });
        }

        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "popup".to_string(),
                reason: "width and height must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
