//! Core error types for the juso widget engine.
//!
//! This module defines the central error type used across all subsystems.
//! Each subsystem error is represented as a variant for clear error propagation.

use thiserror::Error;

/// Central error type for all widget operations.
///
/// Each variant represents an error from a specific subsystem, allowing
/// for clear error propagation and handling across crate boundaries.
#[derive(Error, Debug)]
pub enum JusoError {
    /// Configuration errors (parsing, value validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Postal-code popup script could not be loaded
    #[error("script load error: {0}")]
    ScriptLoad(String),

    /// Postal-code popup failed to open or crashed mid-search
    #[error("popup error: {0}")]
    Popup(String),

    /// Backend API errors (suggestions, validation, geocoding)
    #[error("API error: {0}")]
    Api(String),

    /// Address validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation attempted on a destroyed widget
    #[error("widget has been destroyed")]
    Destroyed,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `JusoError`.
pub type Result<T> = std::result::Result<T, JusoError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
