//! Earnings repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EarningEntity, EarningsSummaryEntity};
use crate::metrics::QueryTimer;

/// Repository for creator earnings.
#[derive(Clone)]
pub struct EarningsRepository {
    pool: PgPool,
}

impl EarningsRepository {
    /// Creates a new EarningsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Record an earnings line.
    pub async fn create(
        &self,
        creator_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
        amount_cents: i64,
        source: &str,
        status: &str,
    ) -> Result<EarningEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_earning");
        let result = sqlx::query_as::<_, EarningEntity>(
            r#"
            INSERT INTO earnings (creator_id, period_start, period_end, amount_cents, source, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, creator_id, period_start, period_end, amount_cents, source, status, created_at
            "#,
        )
        .bind(creator_id)
        .bind(period_start)
        .bind(period_end)
        .bind(amount_cents)
        .bind(source)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Earnings rows for a creator, latest period first.
    pub async fn list_for_creator(
        &self,
        creator_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EarningEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_earnings_for_creator");
        let result = sqlx::query_as::<_, EarningEntity>(
            r#"
            SELECT id, creator_id, period_start, period_end, amount_cents, source, status, created_at
            FROM earnings
            WHERE creator_id = $1
            ORDER BY period_start DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(creator_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Totals across all of a creator's earnings.
    pub async fn summary_for_creator(
        &self,
        creator_id: Uuid,
    ) -> Result<EarningsSummaryEntity, sqlx::Error> {
        let timer = QueryTimer::new("summarize_earnings_for_creator");
        let result = sqlx::query_as::<_, EarningsSummaryEntity>(
            r#"
            SELECT
                COALESCE(SUM(amount_cents), 0)::BIGINT AS total_cents,
                COALESCE(SUM(amount_cents) FILTER (WHERE status = 'pending'), 0)::BIGINT AS pending_cents,
                COALESCE(SUM(amount_cents) FILTER (WHERE status = 'paid'), 0)::BIGINT AS paid_cents
            FROM earnings
            WHERE creator_id = $1
            "#,
        )
        .bind(creator_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
