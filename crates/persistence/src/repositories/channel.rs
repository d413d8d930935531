//! Channel repository for database operations.

use domain::models::channel::ChannelSort;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ChannelEntity;
use crate::metrics::QueryTimer;

/// Input for creating a channel.
#[derive(Debug, Clone)]
pub struct NewChannel<'a> {
    pub owner_id: Uuid,
    pub name: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub thumbnail_url: Option<&'a str>,
    pub category: Option<&'a str>,
    pub content_tags: &'a [String],
    pub is_premium: bool,
    pub is_published: bool,
}

/// Partial channel update. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ChannelChanges<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub thumbnail_url: Option<&'a str>,
    pub category: Option<&'a str>,
    pub content_tags: Option<&'a [String]>,
    pub is_premium: Option<bool>,
    pub is_published: Option<bool>,
}

/// Filters for the public channel listing.
#[derive(Debug, Clone, Default)]
pub struct ChannelListFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    /// Channels carrying any of these tags are left out.
    pub blocked_tags: Vec<String>,
    pub sort: ChannelSort,
    pub limit: i64,
    pub offset: i64,
}

fn order_clause(sort: ChannelSort) -> &'static str {
    match sort {
        ChannelSort::Newest => "created_at DESC, id DESC",
        ChannelSort::Popular => "view_count DESC, created_at DESC, id DESC",
        ChannelSort::Followers => "follower_count DESC, created_at DESC, id DESC",
    }
}

/// Escapes `ILIKE` wildcards so search text matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository for channel-related database operations.
#[derive(Clone)]
pub struct ChannelRepository {
    pool: PgPool,
}

impl ChannelRepository {
    /// Creates a new ChannelRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a new channel.
    pub async fn create(&self, channel: NewChannel<'_>) -> Result<ChannelEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_channel");
        let result = sqlx::query_as::<_, ChannelEntity>(
            r#"
            INSERT INTO channels (owner_id, name, slug, description, thumbnail_url, category,
                                  content_tags, is_premium, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, owner_id, name, slug, description, thumbnail_url, category, content_tags,
                      is_premium, is_published, follower_count, view_count, created_at, updated_at
            "#,
        )
        .bind(channel.owner_id)
        .bind(channel.name)
        .bind(channel.slug)
        .bind(channel.description)
        .bind(channel.thumbnail_url)
        .bind(channel.category)
        .bind(channel.content_tags)
        .bind(channel.is_premium)
        .bind(channel.is_published)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a channel by ID, published or not.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ChannelEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_channel_by_id");
        let result = sqlx::query_as::<_, ChannelEntity>(
            r#"
            SELECT id, owner_id, name, slug, description, thumbnail_url, category, content_tags,
                   is_premium, is_published, follower_count, view_count, created_at, updated_at
            FROM channels
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a channel by slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<ChannelEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_channel_by_slug");
        let result = sqlx::query_as::<_, ChannelEntity>(
            r#"
            SELECT id, owner_id, name, slug, description, thumbnail_url, category, content_tags,
                   is_premium, is_published, follower_count, view_count, created_at, updated_at
            FROM channels
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List published channels.
    pub async fn list(&self, filter: &ChannelListFilter) -> Result<Vec<ChannelEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_channels");

        let sql = format!(
            r#"
            SELECT id, owner_id, name, slug, description, thumbnail_url, category, content_tags,
                   is_premium, is_published, follower_count, view_count, created_at, updated_at
            FROM channels
            WHERE is_published = true
              AND ($1::TEXT IS NULL
                   OR name ILIKE '%' || $1 || '%' ESCAPE '\'
                   OR description ILIKE '%' || $1 || '%' ESCAPE '\')
              AND ($2::TEXT IS NULL OR category = $2)
              AND NOT (content_tags && $3::TEXT[])
            ORDER BY {}
            LIMIT $4 OFFSET $5
            "#,
            order_clause(filter.sort)
        );

        let search = filter.search.as_deref().map(escape_like);

        let result = sqlx::query_as::<_, ChannelEntity>(&sql)
            .bind(search.as_deref())
            .bind(filter.category.as_deref())
            .bind(&filter.blocked_tags)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await;

        timer.record();
        result
    }

    /// List every channel owned by a user, newest first.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ChannelEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_channels_by_owner");
        let result = sqlx::query_as::<_, ChannelEntity>(
            r#"
            SELECT id, owner_id, name, slug, description, thumbnail_url, category, content_tags,
                   is_premium, is_published, follower_count, view_count, created_at, updated_at
            FROM channels
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update.
    pub async fn update(
        &self,
        id: Uuid,
        changes: ChannelChanges<'_>,
    ) -> Result<Option<ChannelEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_channel");
        let result = sqlx::query_as::<_, ChannelEntity>(
            r#"
            UPDATE channels
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                thumbnail_url = COALESCE($4, thumbnail_url),
                category = COALESCE($5, category),
                content_tags = COALESCE($6, content_tags),
                is_premium = COALESCE($7, is_premium),
                is_published = COALESCE($8, is_published)
            WHERE id = $1
            RETURNING id, owner_id, name, slug, description, thumbnail_url, category, content_tags,
                      is_premium, is_published, follower_count, view_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.thumbnail_url)
        .bind(changes.category)
        .bind(changes.content_tags)
        .bind(changes.is_premium)
        .bind(changes.is_published)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a channel. Videos, follows and history go with it.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_channel");
        let result = sqlx::query("DELETE FROM channels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }

    /// Check if a slug already exists.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("channel_slug_exists");
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM channels WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;
        timer.record();
        Ok(result.0)
    }

    /// Generate a unique slug by appending a counter if needed.
    pub async fn generate_unique_slug(&self, base_slug: &str) -> Result<String, sqlx::Error> {
        let mut slug = base_slug.to_string();
        let mut counter = 1;

        while self.slug_exists(&slug).await? {
            counter += 1;
            slug = format!("{}-{}", base_slug, counter);
            if counter > 100 {
                return Err(sqlx::Error::Protocol(
                    "Could not generate unique slug".to_string(),
                ));
            }
        }

        Ok(slug)
    }

    /// Bump the view counter.
    pub async fn increment_views(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("increment_channel_views");
        let result = sqlx::query(
            r#"
            UPDATE channels SET view_count = view_count + 1 WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_is_deterministic() {
        for sort in [ChannelSort::Newest, ChannelSort::Popular, ChannelSort::Followers] {
            assert!(order_clause(sort).ends_with("id DESC"));
        }
        assert!(order_clause(ChannelSort::Followers).starts_with("follower_count"));
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("_"), "\\_");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("lo-fi beats"), "lo-fi beats");
    }
}
