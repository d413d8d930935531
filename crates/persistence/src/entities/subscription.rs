//! Subscription entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::billing::{PlanId, SubscriptionStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the subscriptions table.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: String,
    pub plan: String,
    pub status: String,
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for domain::models::Subscription {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            plan: entity.plan.parse().unwrap_or(PlanId::Free),
            status: entity
                .status
                .parse()
                .unwrap_or(SubscriptionStatus::Incomplete),
            current_period_end: entity.current_period_end,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
