//! Follow models.

use serde::Serialize;
use uuid::Uuid;

/// Result of a follow, unfollow or status lookup.
#[derive(Debug, Clone, Serialize)]
pub struct FollowStatus {
    pub channel_id: Uuid,
    pub following: bool,
    pub follower_count: i32,
}
