//! Earnings entities (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the earnings table.
#[derive(Debug, Clone, FromRow)]
pub struct EarningEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount_cents: i64,
    pub source: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<EarningEntity> for domain::models::Earning {
    fn from(entity: EarningEntity) -> Self {
        Self {
            id: entity.id,
            period_start: entity.period_start,
            period_end: entity.period_end,
            amount_cents: entity.amount_cents,
            source: entity.source,
            status: entity.status,
            created_at: entity.created_at,
        }
    }
}

/// Aggregated totals for one creator.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct EarningsSummaryEntity {
    pub total_cents: i64,
    pub pending_cents: i64,
    pub paid_cents: i64,
}

impl From<EarningsSummaryEntity> for domain::models::EarningsSummary {
    fn from(entity: EarningsSummaryEntity) -> Self {
        Self {
            total_cents: entity.total_cents,
            pending_cents: entity.pending_cents,
            paid_cents: entity.paid_cents,
        }
    }
}
