//! Creator earnings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One payout line for a creator.
#[derive(Debug, Clone, Serialize)]
pub struct Earning {
    pub id: Uuid,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub amount_cents: i64,
    /// `subscription_share` or `ad_revenue`.
    pub source: String,
    /// `pending` or `paid`.
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Totals across all of a creator's earnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EarningsSummary {
    pub total_cents: i64,
    pub pending_cents: i64,
    pub paid_cents: i64,
}

/// Response for GET /api/me/earnings.
#[derive(Debug, Clone, Serialize)]
pub struct EarningsResponse {
    pub summary: EarningsSummary,
    pub data: Vec<Earning>,
}
