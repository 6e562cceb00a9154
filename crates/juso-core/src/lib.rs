//! Juso Core - Foundation crate for the juso address-search widget engine.
//!
//! This crate provides shared types, error handling, and configuration
//! management that the other juso crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - Widget configuration with TOML loading and env overrides
//! - [`types`] - Shared domain types (`AddressRecord`, `SuggestionList`, `Notice`)
//!
//! # Example
//!
//! ```rust
//! use juso_core::WidgetConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WidgetConfig::default();
//! config.validate()?;
//! assert_eq!(config.debounce_delay_ms, 300);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigUpdate, FieldBindings, PopupConfig, WidgetConfig};
pub use error::{ConfigError, ConfigResult, JusoError, Result};
pub use types::{
    AddressRecord, FieldKey, Notice, NoticeKind, PopupOutcome, PopupSelection, SuggestionList,
    ValidationState,
};
