//! Error types for the hieragg client

use std::path::PathBuf;

use hieragg_core::dto::discovery::ErrorResponse;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the hieragg client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The log file could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Create an API error from status code and response body
    ///
    /// Bodies of the form `{"error": "..."}` are reduced to their message.
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(response) => response.error,
            Err(_) => body,
        };

        Self::ApiError { status, message }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if (400..500).contains(status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_extracts_message() {
        let err = ClientError::api_error(404, r#"{"error":"Log x not found"}"#);
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "API error (status 404): Log x not found");
    }

    #[test]
    fn test_api_error_keeps_plain_body() {
        let err = ClientError::api_error(502, "Bad Gateway");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "API error (status 502): Bad Gateway");
    }
}
