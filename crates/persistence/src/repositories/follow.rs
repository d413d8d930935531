//! Follow repository for database operations.
//!
//! `channels.follower_count` is only touched when a follows row is actually
//! inserted or deleted, in the same transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ChannelEntity, FollowerCountEntity};
use crate::metrics::QueryTimer;

/// Repository for follow-related database operations.
#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    /// Creates a new FollowRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Follow a channel. Returns the follower count after the call.
    ///
    /// Following twice is a no-op.
    pub async fn follow(&self, follower_id: Uuid, channel_id: Uuid) -> Result<i32, sqlx::Error> {
        let timer = QueryTimer::new("follow_channel");
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, channel_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, channel_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(channel_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let count = if inserted > 0 {
            sqlx::query_as::<_, FollowerCountEntity>(
                r#"
                UPDATE channels SET follower_count = follower_count + 1
                WHERE id = $1
                RETURNING follower_count
                "#,
            )
            .bind(channel_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, FollowerCountEntity>(
                "SELECT follower_count FROM channels WHERE id = $1",
            )
            .bind(channel_id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        timer.record();
        Ok(count.follower_count)
    }

    /// Unfollow a channel. Returns the follower count after the call.
    ///
    /// Unfollowing a channel that is not followed is a no-op.
    pub async fn unfollow(&self, follower_id: Uuid, channel_id: Uuid) -> Result<i32, sqlx::Error> {
        let timer = QueryTimer::new("unfollow_channel");
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM follows WHERE follower_id = $1 AND channel_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(channel_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let count = if deleted > 0 {
            sqlx::query_as::<_, FollowerCountEntity>(
                r#"
                UPDATE channels SET follower_count = GREATEST(follower_count - 1, 0)
                WHERE id = $1
                RETURNING follower_count
                "#,
            )
            .bind(channel_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_as::<_, FollowerCountEntity>(
                "SELECT follower_count FROM channels WHERE id = $1",
            )
            .bind(channel_id)
            .fetch_one(&mut *tx)
            .await?
        };

        tx.commit().await?;
        timer.record();
        Ok(count.follower_count)
    }

    /// Check whether a user follows a channel.
    pub async fn is_following(
        &self,
        follower_id: Uuid,
        channel_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_following_channel");
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND channel_id = $2)",
        )
        .bind(follower_id)
        .bind(channel_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }

    /// Channels a user follows, most recently followed first.
    pub async fn list_followed_channels(
        &self,
        follower_id: Uuid,
    ) -> Result<Vec<ChannelEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_followed_channels");
        let result = sqlx::query_as::<_, ChannelEntity>(
            r#"
            SELECT c.id, c.owner_id, c.name, c.slug, c.description, c.thumbnail_url, c.category,
                   c.content_tags, c.is_premium, c.is_published, c.follower_count, c.view_count,
                   c.created_at, c.updated_at
            FROM follows f
            JOIN channels c ON c.id = f.channel_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(follower_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
