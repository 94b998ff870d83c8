//! Hieragg HTTP Client
//!
//! A small, typed client for the hieragg discovery server.
//!
//! # Example
//!
//! ```no_run
//! use hieragg_client::HieraggClient;
//! use hieragg_core::dto::aggregate::AggregateQuery;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = HieraggClient::new("http://localhost:5000");
//!
//!     let model = client.discover("claims.csv").await?;
//!     println!("Discovered {} ({} nodes)", model.log_id, model.model.nodes.len());
//!
//!     let query = AggregateQuery {
//!         level: Some(1),
//!         ..Default::default()
//!     };
//!     let coarse = client.aggregate(&model.log_id, &query).await?;
//!     println!("Aggregated tree has {} nodes", coarse.tree.node_count());
//!     Ok(())
//! }
//! ```

mod discovery;
pub mod error;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use hieragg_core::dto::discovery::DiscoveryResponse;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the hieragg server API
#[derive(Debug, Clone)]
pub struct HieraggClient {
    /// Base URL of the server (e.g., "http://localhost:5000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl HieraggClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use hieragg_client::HieraggClient;
    ///
    /// let client = HieraggClient::new("http://localhost:5000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not needed
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HieraggClient::new("http://localhost:5000");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = HieraggClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
