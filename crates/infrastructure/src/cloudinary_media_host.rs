//! Cloudinary-backed media host client.
//!
//! Talks to the Cloudinary Admin API over HTTPS with basic auth. The
//! application layer treats every call as best-effort, so this client
//! only distinguishes "definitely deleted or already gone" from
//! "anything else went wrong".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use velora_application::MediaHost;
use velora_core::{AppError, AppResult};
use velora_domain::MediaResourceType;

/// Connection settings for one Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Cloudinary cloud name (first path segment of every API URL).
    pub cloud_name: String,
    /// API key for basic auth.
    pub api_key: String,
    /// API secret for basic auth.
    pub api_secret: String,
}

/// Cloudinary implementation of the media host port.
#[derive(Clone)]
pub struct CloudinaryMediaHost {
    http_client: reqwest::Client,
    config: CloudinaryConfig,
    base_url: String,
}

impl CloudinaryMediaHost {
    /// Creates a media host client with its own connection pool.
    pub fn new(config: CloudinaryConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build media host client: {error}"))
            })?;

        let base_url = format!("https://api.cloudinary.com/v1_1/{}", config.cloud_name);
        Ok(Self {
            http_client,
            config,
            base_url,
        })
    }

    async fn delete_resources(
        &self,
        public_ids: &[String],
        resource_type: MediaResourceType,
    ) -> AppResult<()> {
        let url = format!(
            "{}/resources/{}/upload",
            self.base_url,
            resource_type.as_str()
        );
        let params: Vec<(&str, &str)> = public_ids
            .iter()
            .map(|public_id| ("public_ids[]", public_id.as_str()))
            .collect();

        let response = self
            .http_client
            .delete(&url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .query(&params)
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("media host request failed: {error}"))
            })?;

        // An asset that is already gone counts as deleted.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!(
                "media host rejected delete with status {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl MediaHost for CloudinaryMediaHost {
    async fn delete_asset(
        &self,
        public_id: &str,
        resource_type: MediaResourceType,
    ) -> AppResult<()> {
        self.delete_resources(&[public_id.to_owned()], resource_type)
            .await
    }

    async fn delete_assets(&self, public_ids: &[String]) -> AppResult<()> {
        // Bulk deletion always targets image assets, matching the upload
        // path the gallery uses for batched operations.
        self.delete_resources(public_ids, MediaResourceType::Image)
            .await
    }
}
