//! Channel entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the channels table.
#[derive(Debug, Clone, FromRow)]
pub struct ChannelEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub content_tags: Vec<String>,
    pub is_premium: bool,
    pub is_published: bool,
    pub follower_count: i32,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChannelEntity> for domain::models::Channel {
    fn from(entity: ChannelEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            name: entity.name,
            slug: entity.slug,
            description: entity.description,
            thumbnail_url: entity.thumbnail_url,
            category: entity.category,
            content_tags: entity.content_tags,
            is_premium: entity.is_premium,
            is_published: entity.is_published,
            follower_count: entity.follower_count,
            view_count: entity.view_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Follow counter returned by follow/unfollow.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct FollowerCountEntity {
    pub follower_count: i32,
}
