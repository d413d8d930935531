//! Channel domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::video::Video;

/// A curated, ordered collection of videos owned by a creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
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

/// Sort order for channel listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSort {
    #[default]
    Newest,
    Popular,
    Followers,
}

impl ChannelSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelSort::Newest => "newest",
            ChannelSort::Popular => "popular",
            ChannelSort::Followers => "followers",
        }
    }
}

impl FromStr for ChannelSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(ChannelSort::Newest),
            "popular" => Ok(ChannelSort::Popular),
            "followers" => Ok(ChannelSort::Followers),
            _ => Err(format!("Invalid sort: {}", s)),
        }
    }
}

impl fmt::Display for ChannelSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request payload for creating a channel.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChannelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_web_url"))]
    pub thumbnail_url: Option<String>,

    #[validate(length(min = 1, max = 40, message = "Category must be between 1 and 40 characters"))]
    pub category: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "crate::models::soulshield::validate_categories"))]
    pub content_tags: Vec<String>,

    #[serde(default)]
    pub is_premium: bool,

    #[serde(default = "default_published")]
    pub is_published: bool,
}

fn default_published() -> bool {
    true
}

/// Request payload for updating a channel. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateChannelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_web_url"))]
    pub thumbnail_url: Option<String>,

    #[validate(length(min = 1, max = 40, message = "Category must be between 1 and 40 characters"))]
    pub category: Option<String>,

    #[validate(custom(function = "crate::models::soulshield::validate_categories"))]
    pub content_tags: Option<Vec<String>>,

    pub is_premium: Option<bool>,

    pub is_published: Option<bool>,
}

/// Query parameters for listing channels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListChannelsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub sort: ChannelSort,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Overrides the caller's own SoulShield setting for this listing.
    pub shield: Option<String>,
}

/// Response for channel listings.
#[derive(Debug, Clone, Serialize)]
pub struct ListChannelsResponse {
    pub data: Vec<Channel>,
    pub count: usize,
    pub limit: i64,
    pub offset: i64,
}

/// Response for channel detail.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelDetail {
    #[serde(flatten)]
    pub channel: Channel,
    pub videos: Vec<Video>,
    pub is_following: bool,
    pub is_owner: bool,
}

/// Generate a URL-safe slug from a channel name.
pub fn generate_slug(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                ' '
            }
        })
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "channel".to_string()
    } else {
        slug
    }
}
