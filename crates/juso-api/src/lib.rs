//! Juso API - Typed client for the admin address endpoints.
//!
//! This crate defines the [`AddressApi`] trait that the widget engine
//! consumes, the wire types for the four REST endpoints, and the
//! production [`HttpAddressApi`] implementation built on `reqwest`.
//!
//! # Modules
//!
//! - [`error`] - API error types
//! - [`types`] - Wire request/response structs and typed verdicts
//! - [`client`] - The `AddressApi` trait and HTTP implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use client::{AddressApi, HttpAddressApi};
pub use error::{ApiError, Result};
pub use types::{Coordinates, DuplicateVerdict, ValidationVerdict};
