//! Discovery endpoints

use std::path::Path;

use hieragg_core::dto::aggregate::AggregateQuery;
use hieragg_core::dto::discovery::DiscoveryResponse;
use reqwest::multipart::{Form, Part};

use crate::HieraggClient;
use crate::error::{ClientError, Result};

impl HieraggClient {
    /// Upload an event log and discover its model
    ///
    /// The file is sent as the `file` field of a multipart form under its
    /// own file name.
    pub async fn discover(&self, path: impl AsRef<Path>) -> Result<DiscoveryResponse> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".to_string());

        tracing::debug!(file = %file_name, bytes = data.len(), "Uploading log");

        let form = Form::new().part("file", Part::bytes(data).file_name(file_name));
        let url = format!("{}/api/discover", self.base_url);
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_response(response).await
    }

    /// Re-aggregate a previously discovered model
    pub async fn aggregate(&self, log_id: &str, query: &AggregateQuery) -> Result<DiscoveryResponse> {
        let url = format!("{}/api/aggregate/{}", self.base_url, log_id);
        let response = self.client.get(&url).query(query).send().await?;

        self.handle_response(response).await
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
