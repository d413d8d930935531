//! Watch history entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::video::EmbedType;
use sqlx::FromRow;
use uuid::Uuid;

/// History row joined with its video and channel.
#[derive(Debug, Clone, FromRow)]
pub struct WatchHistoryEntity {
    pub id: Uuid,
    pub video_id: Uuid,
    pub channel_id: Uuid,
    pub video_title: String,
    pub channel_name: String,
    pub embed_type: String,
    pub thumbnail_url: Option<String>,
    pub progress_secs: i32,
    pub completed: bool,
    pub watched_at: DateTime<Utc>,
}

impl From<WatchHistoryEntity> for domain::models::watch_history::WatchHistoryEntry {
    fn from(entity: WatchHistoryEntity) -> Self {
        Self {
            id: entity.id,
            video_id: entity.video_id,
            channel_id: entity.channel_id,
            video_title: entity.video_title,
            channel_name: entity.channel_name,
            embed_type: entity.embed_type.parse().unwrap_or(EmbedType::Direct),
            thumbnail_url: entity.thumbnail_url,
            progress_secs: entity.progress_secs,
            completed: entity.completed,
            watched_at: entity.watched_at,
        }
    }
}
