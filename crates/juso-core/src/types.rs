//! Shared domain types for the address-search widget.
//!
//! This module defines the address record, popup payloads, the suggestion
//! list with its highlight invariant, validation state, and transient
//! notices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The authoritative selected address, snapshotted from live field state.
///
/// Coordinates are kept as the textual values the bound fields hold; they
/// are empty until a geocode response arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Postal code
    pub zipcode: String,
    /// Road-name address
    pub road_address: String,
    /// Lot-number (jibun) address
    pub jibun_address: String,
    /// Detail address (unit, floor)
    pub detail_address: String,
    /// Combined address (base address plus detail)
    pub full_address: String,
    /// Latitude, as held by the bound field
    pub latitude: String,
    /// Longitude, as held by the bound field
    pub longitude: String,
}

impl AddressRecord {
    /// Returns true if every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zipcode.is_empty()
            && self.road_address.is_empty()
            && self.jibun_address.is_empty()
            && self.detail_address.is_empty()
            && self.full_address.is_empty()
            && self.latitude.is_empty()
            && self.longitude.is_empty()
    }
}

/// Payload returned by the third-party postal-code popup.
///
/// Serde names follow the popup's wire format (camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSelection {
    /// Postal code
    pub zonecode: String,
    /// Address as displayed by the popup
    pub address: String,
    /// Road-name address (may be empty for jibun-only lots)
    #[serde(default)]
    pub road_address: String,
    /// Lot-number (jibun) address
    #[serde(default)]
    pub jibun_address: String,
}

impl PopupSelection {
    /// The canonical base address: road-name address when present,
    /// otherwise the jibun address.
    #[must_use]
    pub fn base_address(&self) -> &str {
        if self.road_address.is_empty() {
            &self.jibun_address
        } else {
            &self.road_address
        }
    }
}

/// Typed outcome of a postal-code popup session.
///
/// `Dismissed` maps the third-party `FORCE_CLOSE` close state: the user
/// cancelled the search, which is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupOutcome {
    /// The user picked an address
    Selected(PopupSelection),
    /// The user closed the popup without picking anything
    Dismissed,
}

/// Ordered suggestion candidates with an optional highlighted entry.
///
/// Entries keep the server's relevance order. Invariant: when
/// `highlighted` is `Some(i)`, `i < entries.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionList {
    entries: Vec<String>,
    highlighted: Option<usize>,
}

impl SuggestionList {
    /// Replace the entries wholesale, resetting the highlight.
    pub fn replace(&mut self, entries: Vec<String>) {
        self.entries = entries;
        self.highlighted = None;
    }

    /// Drop all entries and the highlight.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.highlighted = None;
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in relevance order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The entry at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Index of the highlighted entry, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// The highlighted entry, if any.
    #[must_use]
    pub fn highlighted_entry(&self) -> Option<&str> {
        self.highlighted.and_then(|i| self.get(i))
    }

    /// Move the highlight one entry down, clamping at the last entry.
    ///
    /// With no highlight, moves onto the first entry. No-op on an empty
    /// list.
    pub fn highlight_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.highlighted = Some(match self.highlighted {
            Some(i) => i.saturating_add(1).min(last),
            None => 0,
        });
    }

    /// Move the highlight one entry up, leaving the list (`None`) from the
    /// first entry.
    pub fn highlight_prev(&mut self) {
        self.highlighted = match self.highlighted {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }
}

/// Per-field validation state for the current blur cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationState {
    /// Whether the field currently passes validation
    pub is_valid: bool,
    /// Inline error message when invalid
    pub message: Option<String>,
}

impl ValidationState {
    /// An invalid state carrying an inline message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }
}

impl Default for ValidationState {
    fn default() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }
}

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Neutral information
    Info,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A transient, self-dismissing status message.
///
/// Concurrent notices stack as independent entries; there is no queueing
/// or merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Unique notice identifier
    pub id: Uuid,
    /// Severity
    pub kind: NoticeKind,
    /// Message shown to the user
    pub message: String,
    /// When the notice was created
    pub created_at: DateTime<Utc>,
}

impl Notice {
    /// Create a notice stamped with the current time.
    #[must_use]
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Keys for the synchronized form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    /// Postal code input
    Zipcode,
    /// Combined address input (base address plus detail)
    Address,
    /// Detail address input
    DetailAddress,
    /// Road-name address input
    RoadAddress,
    /// Lot-number (jibun) address input
    JibunAddress,
    /// Latitude hidden input
    Latitude,
    /// Longitude hidden input
    Longitude,
}

impl FieldKey {
    /// Every synchronized field, in a stable order.
    pub const ALL: [Self; 7] = [
        Self::Zipcode,
        Self::Address,
        Self::DetailAddress,
        Self::RoadAddress,
        Self::JibunAddress,
        Self::Latitude,
        Self::Longitude,
    ];
}
