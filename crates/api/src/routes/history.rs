//! Watch history endpoint handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::watch_history::{
    HistoryQuery, HistoryResponse, RecordWatchRequest, WatchHistoryEntry,
};
use persistence::repositories::{ProfileRepository, WatchHistoryRepository};
use serde::Serialize;
use shared::pagination::{decode_cursor, encode_cursor, PageParams};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, UserAuth};

/// Response after recording progress.
#[derive(Debug, Serialize)]
pub struct RecordWatchResponse {
    pub id: Uuid,
    pub video_id: Uuid,
}

/// Record watch progress for a video.
///
/// POST /api/history
pub async fn record_watch(
    State(state): State<AppState>,
    auth: UserAuth,
    JsonBody(request): JsonBody<RecordWatchRequest>,
) -> Result<Json<RecordWatchResponse>, ApiError> {
    request.validate()?;

    ProfileRepository::new(state.pool.clone())
        .ensure_exists(auth.user_id, auth.email.as_deref())
        .await?;

    let id = WatchHistoryRepository::new(state.pool.clone())
        .record(
            auth.user_id,
            request.video_id,
            request.progress_secs,
            request.completed,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    debug!(
        user_id = %auth.user_id,
        video_id = %request.video_id,
        progress_secs = request.progress_secs,
        completed = request.completed,
        "Watch progress recorded"
    );

    Ok(Json(RecordWatchResponse {
        id,
        video_id: request.video_id,
    }))
}

/// The caller's history, newest first.
///
/// GET /api/me/history?cursor=&limit=
pub async fn list_history(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let after = query
        .cursor
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(decode_cursor)
        .transpose()
        .map_err(|e| ApiError::Validation(format!("cursor: {}", e)))?;
    let limit = PageParams {
        limit: query.limit,
        offset: None,
    }
    .limit();

    let mut rows = WatchHistoryRepository::new(state.pool.clone())
        .list(auth.user_id, after, limit)
        .await?;

    let has_more = rows.len() as i64 > limit;
    rows.truncate(limit as usize);

    let next_cursor = if has_more {
        rows.last().map(|r| encode_cursor(r.watched_at, r.id))
    } else {
        None
    };

    let data: Vec<WatchHistoryEntry> = rows.into_iter().map(WatchHistoryEntry::from).collect();

    Ok(Json(HistoryResponse {
        data,
        next_cursor,
        has_more,
    }))
}
