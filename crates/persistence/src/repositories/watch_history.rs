//! Watch history repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::WatchHistoryEntity;
use crate::metrics::QueryTimer;

/// Repository for watch history database operations.
#[derive(Clone)]
pub struct WatchHistoryRepository {
    pool: PgPool,
}

impl WatchHistoryRepository {
    /// Creates a new WatchHistoryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Record progress on a video. One row per (user, video); the latest
    /// call wins and moves the row to the top of the history.
    ///
    /// Returns `None` when the video does not exist.
    pub async fn record(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        progress_secs: i32,
        completed: bool,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("record_watch_history");
        let result: Result<Option<(Uuid,)>, sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO watch_history (user_id, video_id, channel_id, progress_secs, completed)
            SELECT $1, v.id, v.channel_id, $3, $4
            FROM videos v
            WHERE v.id = $2
            ON CONFLICT (user_id, video_id) DO UPDATE
            SET progress_secs = EXCLUDED.progress_secs,
                completed = watch_history.completed OR EXCLUDED.completed,
                watched_at = NOW()
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(progress_secs)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(|(id,)| id))
    }

    /// One page of history, newest first.
    ///
    /// `after` is the `(watched_at, id)` of the last row of the previous page.
    /// Fetches `limit + 1` rows so the caller can tell whether more exist.
    pub async fn list(
        &self,
        user_id: Uuid,
        after: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<WatchHistoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_watch_history");
        let (after_ts, after_id) = match after {
            Some((ts, id)) => (Some(ts), Some(id)),
            None => (None, None),
        };

        let result = sqlx::query_as::<_, WatchHistoryEntity>(
            r#"
            SELECT h.id, h.video_id, h.channel_id, v.title AS video_title, c.name AS channel_name,
                   v.embed_type, v.thumbnail_url, h.progress_secs, h.completed, h.watched_at
            FROM watch_history h
            JOIN videos v ON v.id = h.video_id
            JOIN channels c ON c.id = h.channel_id
            WHERE h.user_id = $1
              AND ($2::TIMESTAMPTZ IS NULL OR (h.watched_at, h.id) < ($2, $3::UUID))
            ORDER BY h.watched_at DESC, h.id DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(after_ts)
        .bind(after_id)
        .bind(limit + 1)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
