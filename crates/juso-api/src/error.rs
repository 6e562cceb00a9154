//! Error types for the address API client.

use thiserror::Error;

/// Errors that can occur while talking to the address endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success HTTP status with the response body preserved
    #[error("API error ({endpoint}): status {status}, {message}")]
    Status {
        /// Endpoint path that was called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Error message (response body text)
        message: String,
    },

    /// The server reported a failure inside a 2xx response
    #[error("request rejected by {endpoint}: {message}")]
    Rejected {
        /// Endpoint path that was called
        endpoint: String,
        /// Server-supplied reason
        message: String,
    },

    /// Response body could not be parsed
    #[error("failed to parse response from {endpoint}: {message}")]
    Parse {
        /// Endpoint path that was called
        endpoint: String,
        /// Parse error message
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ApiError> for juso_core::JusoError {
    fn from(err: ApiError) -> Self {
        Self::Api(err.to_string())
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            endpoint: "/api/admin/validate-address".to_string(),
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (/api/admin/validate-address): status 500, Internal Server Error"
        );

        let err = ApiError::Rejected {
            endpoint: "/api/admin/geocode-address".to_string(),
            message: "no match".to_string(),
        };
        assert!(err.to_string().contains("no match"));
    }
}
