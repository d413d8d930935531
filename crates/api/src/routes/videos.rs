//! Playlist endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::video::{detect_embed, AddVideoRequest, ReorderVideosRequest};
use domain::models::Video;
use persistence::repositories::{NewEmbeddedVideo, ReorderOutcome, VideoRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, OptionalUserAuth, UserAuth};
use crate::routes::channels::{owned_channel, visible_channel};

async fn playlist(state: &AppState, channel_id: Uuid) -> Result<Vec<Video>, ApiError> {
    Ok(VideoRepository::new(state.pool.clone())
        .list_by_channel(channel_id)
        .await?
        .into_iter()
        .map(Video::from)
        .collect())
}

/// Ordered videos of a channel.
///
/// GET /api/channels/:channel_id/videos
pub async fn list_videos(
    State(state): State<AppState>,
    auth: OptionalUserAuth,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<Vec<Video>>, ApiError> {
    visible_channel(&state, channel_id, auth.user_id()).await?;
    Ok(Json(playlist(&state, channel_id).await?))
}

/// Append an embedded video, detecting the provider from its URL.
///
/// POST /api/channels/:channel_id/videos
pub async fn add_video(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(channel_id): Path<Uuid>,
    JsonBody(request): JsonBody<AddVideoRequest>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    request.validate()?;
    owned_channel(&state, channel_id, auth.user_id).await?;

    let source =
        detect_embed(&request.url).map_err(|e| ApiError::Validation(format!("url: {}", e)))?;
    let thumbnail_url = request
        .thumbnail_url
        .clone()
        .or_else(|| source.default_thumbnail());

    let entity = VideoRepository::new(state.pool.clone())
        .create_embedded(NewEmbeddedVideo {
            channel_id,
            title: request.title.trim(),
            description: request.description.as_deref(),
            embed_type: source.embed_type.as_str(),
            source_url: &source.source_url,
            external_id: source.external_id.as_deref(),
            thumbnail_url: thumbnail_url.as_deref(),
            duration_secs: request.duration_secs,
        })
        .await?;

    info!(
        channel_id = %channel_id,
        video_id = %entity.id,
        embed_type = %source.embed_type,
        position = entity.position,
        "Video added"
    );

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// Rewrite the playlist order.
///
/// PUT /api/channels/:channel_id/videos/order
pub async fn reorder_videos(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(channel_id): Path<Uuid>,
    JsonBody(request): JsonBody<ReorderVideosRequest>,
) -> Result<Json<Vec<Video>>, ApiError> {
    owned_channel(&state, channel_id, auth.user_id).await?;

    let outcome = VideoRepository::new(state.pool.clone())
        .reorder(channel_id, &request.video_ids)
        .await?;

    if outcome == ReorderOutcome::Mismatch {
        return Err(ApiError::Validation(
            "video_ids must list every video of the channel exactly once".to_string(),
        ));
    }

    info!(channel_id = %channel_id, count = request.video_ids.len(), "Playlist reordered");

    Ok(Json(playlist(&state, channel_id).await?))
}

/// Remove a video from a channel.
///
/// DELETE /api/channels/:channel_id/videos/:video_id
pub async fn delete_video(
    State(state): State<AppState>,
    auth: UserAuth,
    Path((channel_id, video_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    owned_channel(&state, channel_id, auth.user_id).await?;

    let deleted = VideoRepository::new(state.pool.clone())
        .delete(channel_id, video_id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    info!(channel_id = %channel_id, video_id = %video_id, "Video removed");

    Ok(StatusCode::NO_CONTENT)
}
