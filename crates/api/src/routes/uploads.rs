//! Direct upload handler.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::video::{CreateUploadRequest, CreateUploadResponse};
use persistence::repositories::VideoRepository;
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, UserAuth};
use crate::routes::channels::owned_channel;

/// Start a direct upload into one of the caller's channels.
///
/// The video row is created first so its id can travel through the
/// pipeline as passthrough; webhooks then find it again.
///
/// POST /api/uploads
pub async fn create_upload(
    State(state): State<AppState>,
    auth: UserAuth,
    JsonBody(request): JsonBody<CreateUploadRequest>,
) -> Result<(StatusCode, Json<CreateUploadResponse>), ApiError> {
    request.validate()?;
    owned_channel(&state, request.channel_id, auth.user_id).await?;

    let repo = VideoRepository::new(state.pool.clone());
    let video = repo
        .create_upload(
            request.channel_id,
            request.title.trim(),
            request.description.as_deref(),
        )
        .await?;

    let upload = match state
        .video_pipeline
        .create_direct_upload(video.id, &state.config.mux.cors_origin)
        .await
    {
        Ok(upload) => upload,
        Err(e) => {
            if let Err(cleanup) = repo.delete(request.channel_id, video.id).await {
                warn!(video_id = %video.id, error = %cleanup, "Failed to remove orphaned upload row");
            }
            return Err(e.into());
        }
    };

    repo.set_upload_id(video.id, &upload.upload_id).await?;

    info!(
        channel_id = %request.channel_id,
        video_id = %video.id,
        upload_id = %upload.upload_id,
        "Direct upload created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateUploadResponse {
            video_id: video.id,
            upload_id: upload.upload_id,
            upload_url: upload.upload_url,
        }),
    ))
}
