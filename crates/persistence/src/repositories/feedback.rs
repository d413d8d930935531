//! Feedback repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::FeedbackEntity;
use crate::metrics::QueryTimer;

/// Repository for feedback submissions.
#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    /// Creates a new FeedbackRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Store a sanitized submission.
    pub async fn create(
        &self,
        user_id: Option<Uuid>,
        category: &str,
        message: &str,
        page_url: Option<&str>,
        client_hash: &str,
    ) -> Result<FeedbackEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_feedback");
        let result = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            INSERT INTO feedback (user_id, category, message, page_url, client_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, category, message, page_url, client_hash, created_at
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(message)
        .bind(page_url)
        .bind(client_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
