//! Follow endpoint handlers.
//!
//! Following is idempotent in both directions; repeating a call returns the
//! current state without touching the counter.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::follow::FollowStatus;
use persistence::repositories::{FollowRepository, ProfileRepository};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_follow_change;
use crate::routes::channels::visible_channel;

/// Follow a channel.
///
/// POST /api/channels/:channel_id/follow
pub async fn follow_channel(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<FollowStatus>, ApiError> {
    visible_channel(&state, channel_id, Some(auth.user_id)).await?;

    ProfileRepository::new(state.pool.clone())
        .ensure_exists(auth.user_id, auth.email.as_deref())
        .await?;

    let follower_count = FollowRepository::new(state.pool.clone())
        .follow(auth.user_id, channel_id)
        .await?;

    record_follow_change("follow");
    info!(channel_id = %channel_id, user_id = %auth.user_id, follower_count, "Channel followed");

    Ok(Json(FollowStatus {
        channel_id,
        following: true,
        follower_count,
    }))
}

/// Unfollow a channel.
///
/// DELETE /api/channels/:channel_id/follow
pub async fn unfollow_channel(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<FollowStatus>, ApiError> {
    visible_channel(&state, channel_id, Some(auth.user_id)).await?;

    let follower_count = FollowRepository::new(state.pool.clone())
        .unfollow(auth.user_id, channel_id)
        .await?;

    record_follow_change("unfollow");
    info!(channel_id = %channel_id, user_id = %auth.user_id, follower_count, "Channel unfollowed");

    Ok(Json(FollowStatus {
        channel_id,
        following: false,
        follower_count,
    }))
}

/// Whether the caller follows a channel.
///
/// GET /api/channels/:channel_id/follow
pub async fn follow_status(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<FollowStatus>, ApiError> {
    let channel = visible_channel(&state, channel_id, Some(auth.user_id)).await?;

    let following = FollowRepository::new(state.pool.clone())
        .is_following(auth.user_id, channel_id)
        .await?;

    Ok(Json(FollowStatus {
        channel_id,
        following,
        follower_count: channel.follower_count,
    }))
}
