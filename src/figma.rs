//! Figma API client
//!
//! Thin REST client over the Figma file endpoints. Only the shape of the
//! returned JSON matters downstream, so responses are passed through as
//! `serde_json::Value`. Each call is a single round trip: no retries, and
//! any failure aborts the whole operation.

use std::time::Duration;

use serde_json::Value;

use crate::config::TransportConfig;
use crate::error::FigspecError;

/// Figma REST API base
const FIGMA_API_URL: &str = "https://api.figma.com/v1";

/// Full-file fetches can run to tens of megabytes for large documents
const FILE_TIMEOUT: Duration = Duration::from_secs(300);

/// Node and image lookups are small keyed queries
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Figma REST API
#[derive(Clone)]
pub struct FigmaClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl FigmaClient {
    /// Create a client from a personal access token and transport settings
    pub fn new(
        access_token: impl Into<String>,
        transport: TransportConfig,
    ) -> Result<Self, FigspecError> {
        Ok(Self {
            client: transport.client()?,
            access_token: access_token.into(),
            base_url: FIGMA_API_URL.to_string(),
        })
    }

    /// Override the API base URL (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch a complete design file
    pub async fn get_file(&self, file_id: &str) -> Result<Value, FigspecError> {
        self.get(&format!("/files/{file_id}"), &[], FILE_TIMEOUT)
            .await
    }

    /// Fetch specific nodes of a file by ID
    pub async fn get_file_nodes(
        &self,
        file_id: &str,
        node_ids: &[String],
    ) -> Result<Value, FigspecError> {
        self.get(
            &format!("/files/{file_id}/nodes"),
            &[("ids", node_ids.join(","))],
            LOOKUP_TIMEOUT,
        )
        .await
    }

    /// Fetch rendered image URLs for specific nodes
    pub async fn get_images(
        &self,
        file_id: &str,
        node_ids: &[String],
        format: &str,
        scale: f64,
    ) -> Result<Value, FigspecError> {
        self.get(
            &format!("/images/{file_id}"),
            &[
                ("ids", node_ids.join(",")),
                ("format", format.to_string()),
                ("scale", scale.to_string()),
            ],
            LOOKUP_TIMEOUT,
        )
        .await
    }

    /// Lightweight connectivity probe (current user endpoint)
    pub async fn me(&self) -> Result<Value, FigspecError> {
        self.get("/me", &[], LOOKUP_TIMEOUT).await
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<Value, FigspecError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Sending request to Figma API");

        let response = self
            .client
            .get(&url)
            .header("X-Figma-Token", &self.access_token)
            .query(query)
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status, message = %message, "Figma API error");
            return Err(FigspecError::Api {
                provider: "figma",
                status,
                message,
            });
        }

        let body: Value = response.json().await?;
        Ok(body)
    }
}
