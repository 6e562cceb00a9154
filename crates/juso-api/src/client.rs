//! The `AddressApi` trait seam and its HTTP implementation.

use crate::error::{ApiError, Result};
use crate::types::{
    Coordinates, DuplicateCheckRequest, DuplicateCheckResponse, DuplicateVerdict, GeocodeRequest,
    GeocodeResponse, SuggestionRequest, SuggestionResponse, ValidateRequest, ValidateResponse,
    ValidationVerdict,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Header carrying the CSRF token on mutating calls.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Endpoint paths, relative to the configured base URL.
const SUGGESTIONS_PATH: &str = "/api/admin/address-suggestions";
const VALIDATE_PATH: &str = "/api/admin/validate-address";
const GEOCODE_PATH: &str = "/api/admin/geocode-address";
const DUPLICATE_PATH: &str = "/api/admin/check-address-duplicate";

/// Trait for address backends.
///
/// The widget engine talks to the backend only through this trait, so
/// tests and alternative transports can stand in for the HTTP client.
/// Implementations must be thread-safe (Send + Sync) for use in async
/// contexts.
#[async_trait]
pub trait AddressApi: Send + Sync {
    /// Fetch suggestion candidates for a partial query.
    ///
    /// # Errors
    /// Returns error on network failure or an unparsable response.
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<String>>;

    /// Ask the server whether an address is acceptable.
    ///
    /// # Errors
    /// Returns error on network failure or an unparsable response.
    async fn validate(&self, address: &str) -> Result<ValidationVerdict>;

    /// Resolve an address into coordinates.
    ///
    /// # Errors
    /// Returns error on network failure, an unparsable response, or a
    /// server-reported geocoding failure.
    async fn geocode(&self, address: &str) -> Result<Coordinates>;

    /// Check whether another record already uses this address.
    ///
    /// # Errors
    /// Returns error on network failure or an unparsable response.
    async fn check_duplicate(
        &self,
        address: &str,
        exclude_id: Option<&str>,
    ) -> Result<DuplicateVerdict>;
}

/// HTTP implementation of [`AddressApi`] over the admin REST endpoints.
///
/// All calls POST JSON and attach the configured CSRF token. There is no
/// default request timeout; a hung call leaves the owning feature in its
/// last-known state. Hosts that want bounded waits construct the client
/// with [`HttpAddressApi::with_timeout`].
pub struct HttpAddressApi {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl HttpAddressApi {
    /// Create a new client against the given base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            csrf_token: None,
        })
    }

    /// Create a new client with a per-request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            csrf_token: None,
        })
    }

    /// Attach the CSRF token the host read from its page metadata.
    #[must_use]
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// POST a JSON body to an endpoint and parse the JSON response.
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        let mut request = self.client.post(url).json(body);

        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| ApiError::Parse {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl AddressApi for HttpAddressApi {
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let response: SuggestionResponse = self
            .post(SUGGESTIONS_PATH, &SuggestionRequest { query, limit })
            .await?;

        if response.success {
            Ok(response.suggestions)
        } else {
            tracing::debug!(query, "suggestion endpoint reported failure");
            Ok(Vec::new())
        }
    }

    async fn validate(&self, address: &str) -> Result<ValidationVerdict> {
        let response: ValidateResponse =
            self.post(VALIDATE_PATH, &ValidateRequest { address }).await?;

        Ok(ValidationVerdict {
            accepted: response.success,
            message: response.error,
        })
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        let response: GeocodeResponse =
            self.post(GEOCODE_PATH, &GeocodeRequest { address }).await?;

        match (response.success, response.latitude, response.longitude) {
            (true, Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(ApiError::Rejected {
                endpoint: GEOCODE_PATH.to_string(),
                message: "address could not be geocoded".to_string(),
            }),
        }
    }

    async fn check_duplicate(
        &self,
        address: &str,
        exclude_id: Option<&str>,
    ) -> Result<DuplicateVerdict> {
        let response: DuplicateCheckResponse = self
            .post(
                DUPLICATE_PATH,
                &DuplicateCheckRequest {
                    address,
                    exclude_id,
                },
            )
            .await?;

        Ok(DuplicateVerdict {
            duplicate: response.duplicate,
            message: response.message,
        })
    }
}
