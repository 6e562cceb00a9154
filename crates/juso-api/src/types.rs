//! Wire types for the address endpoints and the typed results handed to
//! callers.

use serde::{Deserialize, Serialize};

// Wire request/response types. The backend speaks JSON with snake_case
// keys except `exclude_id`, which is spelled out explicitly for clarity.

#[derive(Debug, Serialize)]
pub(crate) struct SuggestionRequest<'a> {
    pub query: &'a str,
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionResponse {
    pub success: bool,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidateRequest<'a> {
    pub address: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeocodeRequest<'a> {
    pub address: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub success: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DuplicateCheckRequest<'a> {
    pub address: &'a str,
    #[serde(rename = "exclude_id", skip_serializing_if = "Option::is_none")]
    pub exclude_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DuplicateCheckResponse {
    #[serde(default)]
    pub duplicate: bool,
    #[serde(default)]
    pub message: String,
}

/// Server verdict on an address validation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    /// Whether the server accepted the address
    pub accepted: bool,
    /// Server-supplied rejection message, when rejected
    pub message: Option<String>,
}

/// Geographic coordinates resolved for an address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Result of an address uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateVerdict {
    /// Whether another record already uses this address
    pub duplicate: bool,
    /// Human-readable explanation
    pub message: String,
}
