//! Video repository for database operations.

use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::entities::VideoEntity;
use crate::metrics::QueryTimer;

/// Input for adding an embedded video.
#[derive(Debug, Clone)]
pub struct NewEmbeddedVideo<'a> {
    pub channel_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub embed_type: &'a str,
    pub source_url: &'a str,
    pub external_id: Option<&'a str>,
    pub thumbnail_url: Option<&'a str>,
    pub duration_secs: Option<i32>,
}

/// Outcome of a playlist reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    Reordered,
    /// The given ids are not exactly the channel's videos.
    Mismatch,
}

/// Repository for video-related database operations.
#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    /// Creates a new VideoRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Position a new video would take at the end of the playlist.
    pub async fn next_position(&self, channel_id: Uuid) -> Result<i32, sqlx::Error> {
        let timer = QueryTimer::new("next_video_position");
        let result: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(position) + 1, 0)::INT FROM videos WHERE channel_id = $1",
        )
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }

    /// Append an embedded video to the end of a channel's playlist.
    pub async fn create_embedded(
        &self,
        video: NewEmbeddedVideo<'_>,
    ) -> Result<VideoEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_embedded_video");
        let result = sqlx::query_as::<_, VideoEntity>(
            r#"
            INSERT INTO videos (channel_id, title, description, embed_type, source_url, external_id,
                                thumbnail_url, duration_secs, position, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM videos WHERE channel_id = $1),
                    'ready')
            RETURNING id, channel_id, title, description, embed_type, source_url, external_id,
                      thumbnail_url, duration_secs, position, status, mux_upload_id, mux_asset_id,
                      mux_playback_id, created_at, updated_at
            "#,
        )
        .bind(video.channel_id)
        .bind(video.title)
        .bind(video.description)
        .bind(video.embed_type)
        .bind(video.source_url)
        .bind(video.external_id)
        .bind(video.thumbnail_url)
        .bind(video.duration_secs)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Append a placeholder row for a direct upload.
    pub async fn create_upload(
        &self,
        channel_id: Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<VideoEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_upload_video");
        let result = sqlx::query_as::<_, VideoEntity>(
            r#"
            INSERT INTO videos (channel_id, title, description, embed_type, position, status)
            VALUES ($1, $2, $3, 'mux',
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM videos WHERE channel_id = $1),
                    'uploading')
            RETURNING id, channel_id, title, description, embed_type, source_url, external_id,
                      thumbnail_url, duration_secs, position, status, mux_upload_id, mux_asset_id,
                      mux_playback_id, created_at, updated_at
            "#,
        )
        .bind(channel_id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Link a placeholder row to the pipeline's upload id.
    pub async fn set_upload_id(&self, video_id: Uuid, upload_id: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_video_upload_id");
        let result = sqlx::query("UPDATE videos SET mux_upload_id = $2 WHERE id = $1")
            .bind(video_id)
            .bind(upload_id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|_| ())
    }

    /// Ordered playlist of a channel.
    pub async fn list_by_channel(&self, channel_id: Uuid) -> Result<Vec<VideoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_videos_by_channel");
        let result = sqlx::query_as::<_, VideoEntity>(
            r#"
            SELECT id, channel_id, title, description, embed_type, source_url, external_id,
                   thumbnail_url, duration_secs, position, status, mux_upload_id, mux_asset_id,
                   mux_playback_id, created_at, updated_at
            FROM videos
            WHERE channel_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a video by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VideoEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_video_by_id");
        let result = sqlx::query_as::<_, VideoEntity>(
            r#"
            SELECT id, channel_id, title, description, embed_type, source_url, external_id,
                   thumbnail_url, duration_secs, position, status, mux_upload_id, mux_asset_id,
                   mux_playback_id, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove a video from a channel. Returns false if it was not there.
    pub async fn delete(&self, channel_id: Uuid, video_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_video");
        let result = sqlx::query("DELETE FROM videos WHERE id = $1 AND channel_id = $2")
            .bind(video_id)
            .bind(channel_id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }

    /// Rewrite playlist positions to `0..n` in the given order.
    ///
    /// The ids must be exactly the channel's current videos, without
    /// duplicates; otherwise nothing changes.
    pub async fn reorder(
        &self,
        channel_id: Uuid,
        video_ids: &[Uuid],
    ) -> Result<ReorderOutcome, sqlx::Error> {
        let timer = QueryTimer::new("reorder_videos");
        let mut tx = self.pool.begin().await?;

        let current: Vec<(Uuid,)> =
            sqlx::query_as("SELECT id FROM videos WHERE channel_id = $1 FOR UPDATE")
                .bind(channel_id)
                .fetch_all(&mut *tx)
                .await?;

        let current: HashSet<Uuid> = current.into_iter().map(|(id,)| id).collect();
        let requested: HashSet<Uuid> = video_ids.iter().copied().collect();
        if requested.len() != video_ids.len() || requested != current {
            tx.rollback().await?;
            timer.record();
            return Ok(ReorderOutcome::Mismatch);
        }

        sqlx::query(
            r#"
            UPDATE videos v
            SET position = (o.ord - 1)::INT
            FROM UNNEST($2::UUID[]) WITH ORDINALITY AS o(id, ord)
            WHERE v.id = o.id AND v.channel_id = $1
            "#,
        )
        .bind(channel_id)
        .bind(video_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(ReorderOutcome::Reordered)
    }

    /// `video.upload.asset_created`: remember the asset and mark processing.
    ///
    /// Returns the affected video id, if any.
    pub async fn attach_asset_by_upload(
        &self,
        upload_id: &str,
        asset_id: &str,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("attach_video_asset");
        let result: Result<Option<(Uuid,)>, sqlx::Error> = sqlx::query_as(
            r#"
            UPDATE videos
            SET mux_asset_id = $2, status = 'processing'
            WHERE mux_upload_id = $1
            RETURNING id
            "#,
        )
        .bind(upload_id)
        .bind(asset_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(|(id,)| id))
    }

    /// `video.asset.ready`: store playback details.
    ///
    /// The row is found by `video_id` when the pipeline passed it through,
    /// otherwise by asset id.
    pub async fn mark_ready(
        &self,
        video_id: Option<Uuid>,
        asset_id: &str,
        playback_id: Option<&str>,
        duration_secs: Option<i32>,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("mark_video_ready");
        let result: Result<Option<(Uuid,)>, sqlx::Error> = sqlx::query_as(
            r#"
            UPDATE videos
            SET status = 'ready',
                mux_asset_id = $2,
                mux_playback_id = COALESCE($3, mux_playback_id),
                external_id = COALESCE($3, external_id),
                source_url = COALESCE('https://stream.mux.com/' || $3 || '.m3u8', source_url),
                thumbnail_url = COALESCE(thumbnail_url, 'https://image.mux.com/' || $3 || '/thumbnail.jpg'),
                duration_secs = COALESCE($4, duration_secs)
            WHERE id = (
                SELECT id FROM videos
                WHERE ($1::UUID IS NOT NULL AND id = $1) OR mux_asset_id = $2
                ORDER BY (id = $1) DESC NULLS LAST
                LIMIT 1
            )
            RETURNING id
            "#,
        )
        .bind(video_id)
        .bind(asset_id)
        .bind(playback_id)
        .bind(duration_secs)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(|(id,)| id))
    }

    /// Mark the video behind an asset as errored.
    pub async fn mark_errored_by_asset(
        &self,
        video_id: Option<Uuid>,
        asset_id: &str,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("mark_video_errored_by_asset");
        let result: Result<Option<(Uuid,)>, sqlx::Error> = sqlx::query_as(
            r#"
            UPDATE videos
            SET status = 'errored'
            WHERE id = (
                SELECT id FROM videos
                WHERE ($1::UUID IS NOT NULL AND id = $1) OR mux_asset_id = $2
                ORDER BY (id = $1) DESC NULLS LAST
                LIMIT 1
            )
            RETURNING id
            "#,
        )
        .bind(video_id)
        .bind(asset_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(|(id,)| id))
    }

    /// Mark the video behind a cancelled or failed upload as errored.
    pub async fn mark_errored_by_upload(
        &self,
        upload_id: &str,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("mark_video_errored_by_upload");
        let result: Result<Option<(Uuid,)>, sqlx::Error> = sqlx::query_as(
            r#"
            UPDATE videos SET status = 'errored'
            WHERE mux_upload_id = $1
            RETURNING id
            "#,
        )
        .bind(upload_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result.map(|row| row.map(|(id,)| id))
    }
}
