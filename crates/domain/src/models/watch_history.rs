//! Watch history models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::video::EmbedType;

/// Request payload for recording watch progress.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordWatchRequest {
    pub video_id: Uuid,

    #[validate(range(min = 0, max = 86400, message = "Progress must be between 0 and 86400 seconds"))]
    #[serde(default)]
    pub progress_secs: i32,

    #[serde(default)]
    pub completed: bool,
}

/// One row of a viewer's history, joined with the video it points at.
#[derive(Debug, Clone, Serialize)]
pub struct WatchHistoryEntry {
    pub id: Uuid,
    pub video_id: Uuid,
    pub channel_id: Uuid,
    pub video_title: String,
    pub channel_name: String,
    pub embed_type: EmbedType,
    pub thumbnail_url: Option<String>,
    pub progress_secs: i32,
    pub completed: bool,
    pub watched_at: DateTime<Utc>,
}

/// Query parameters for listing history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// Cursor-paginated history response.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<WatchHistoryEntry>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}
