//! Feedback entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the feedback table.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackEntity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub category: String,
    pub message: String,
    pub page_url: Option<String>,
    pub client_hash: String,
    pub created_at: DateTime<Utc>,
}
