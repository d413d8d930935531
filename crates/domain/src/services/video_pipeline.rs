//! Hosted video pipeline abstraction.
//!
//! Creators upload files straight to the pipeline's storage. We only create
//! the upload slot and later learn about the resulting asset via webhooks.

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum VideoPipelineError {
    #[error("Video pipeline is not configured")]
    NotConfigured,

    #[error("Video pipeline request failed: {0}")]
    Request(String),

    #[error("Unexpected video pipeline response: {0}")]
    InvalidResponse(String),
}

/// A direct upload slot the browser can PUT the file into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectUpload {
    pub upload_id: String,
    pub upload_url: String,
}

#[async_trait::async_trait]
pub trait VideoPipeline: Send + Sync {
    /// Creates a direct upload. `video_id` is passed through to the asset so
    /// webhooks can be matched back to the video row.
    async fn create_direct_upload(
        &self,
        video_id: Uuid,
        cors_origin: &str,
    ) -> Result<DirectUpload, VideoPipelineError>;
}

/// Mock pipeline for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MockVideoPipeline {
    pub simulate_failure: bool,
}

impl MockVideoPipeline {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl VideoPipeline for MockVideoPipeline {
    async fn create_direct_upload(
        &self,
        video_id: Uuid,
        cors_origin: &str,
    ) -> Result<DirectUpload, VideoPipelineError> {
        if self.simulate_failure {
            tracing::warn!(video_id = %video_id, "Mock video pipeline simulating failure");
            return Err(VideoPipelineError::Request("Simulated failure".to_string()));
        }

        let upload_id = format!("upload_mock_{}", video_id.simple());
        tracing::info!(
            video_id = %video_id,
            upload_id = %upload_id,
            cors_origin = %cors_origin,
            "Mock: Would create direct upload"
        );

        Ok(DirectUpload {
            upload_url: format!("https://storage.mock.local/uploads/{}", upload_id),
            upload_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_pipeline_upload() {
        let upload = MockVideoPipeline::new()
            .create_direct_upload(Uuid::nil(), "*")
            .await
            .unwrap();
        assert_eq!(upload.upload_id, format!("upload_mock_{}", Uuid::nil().simple()));
        assert!(upload.upload_url.contains(&upload.upload_id));
    }

    #[tokio::test]
    async fn test_mock_pipeline_failure() {
        let result = MockVideoPipeline::failing()
            .create_direct_upload(Uuid::new_v4(), "*")
            .await;
        assert!(matches!(result, Err(VideoPipelineError::Request(_))));
    }
}
