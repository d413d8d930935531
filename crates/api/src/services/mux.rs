//! Mux Video client.
//!
//! Creates direct uploads. Asset state changes arrive later through the
//! Mux webhook.

use domain::services::{DirectUpload, VideoPipeline, VideoPipelineError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::MuxConfig;

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    id: String,
    url: String,
}

/// [`VideoPipeline`] backed by Mux direct uploads.
#[derive(Clone)]
pub struct MuxClient {
    client: Client,
    config: MuxConfig,
}

impl std::fmt::Debug for MuxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MuxClient")
            .field("api_base", &self.config.api_base)
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl MuxClient {
    pub fn new(config: MuxConfig) -> Result<Self, VideoPipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| VideoPipelineError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        !self.config.token_id.is_empty() && !self.config.token_secret.is_empty()
    }

    fn uploads_url(&self) -> String {
        format!("{}/video/v1/uploads", self.config.api_base.trim_end_matches('/'))
    }
}

fn upload_body(video_id: Uuid, cors_origin: &str) -> serde_json::Value {
    json!({
        "cors_origin": cors_origin,
        "new_asset_settings": {
            "playback_policy": ["public"],
            "passthrough": video_id.to_string(),
        },
    })
}

#[async_trait::async_trait]
impl VideoPipeline for MuxClient {
    async fn create_direct_upload(
        &self,
        video_id: Uuid,
        cors_origin: &str,
    ) -> Result<DirectUpload, VideoPipelineError> {
        if !self.is_configured() {
            return Err(VideoPipelineError::NotConfigured);
        }

        let response = self
            .client
            .post(self.uploads_url())
            .basic_auth(&self.config.token_id, Some(&self.config.token_secret))
            .json(&upload_body(video_id, cors_origin))
            .send()
            .await
            .map_err(|e| VideoPipelineError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %error_text, "Mux upload request failed");
            return Err(VideoPipelineError::Request(format!("HTTP {}", status)));
        }

        let envelope: UploadEnvelope = response
            .json()
            .await
            .map_err(|e| VideoPipelineError::InvalidResponse(e.to_string()))?;

        debug!(video_id = %video_id, upload_id = %envelope.data.id, "Created direct upload");
        Ok(DirectUpload {
            upload_id: envelope.data.id,
            upload_url: envelope.data.url,
        })
    }
}
