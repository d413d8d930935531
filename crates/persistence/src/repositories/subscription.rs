//! Subscription repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SubscriptionEntity;
use crate::metrics::QueryTimer;

/// Repository for Stripe subscription rows.
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Creates a new SubscriptionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create or refresh the subscription opened by a completed checkout.
    pub async fn upsert_from_checkout(
        &self,
        user_id: Uuid,
        stripe_customer_id: Option<&str>,
        stripe_subscription_id: &str,
        plan: &str,
        status: &str,
    ) -> Result<SubscriptionEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_subscription_from_checkout");
        let result = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            INSERT INTO subscriptions (user_id, stripe_customer_id, stripe_subscription_id, plan, status)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (stripe_subscription_id) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                stripe_customer_id = COALESCE(EXCLUDED.stripe_customer_id, subscriptions.stripe_customer_id),
                plan = EXCLUDED.plan,
                status = EXCLUDED.status
            RETURNING id, user_id, stripe_customer_id, stripe_subscription_id, plan, status,
                      current_period_end, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(stripe_customer_id)
        .bind(stripe_subscription_id)
        .bind(plan)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a status change reported by Stripe.
    ///
    /// Returns the updated row, or `None` for a subscription we never saw.
    pub async fn update_status(
        &self,
        stripe_subscription_id: &str,
        status: &str,
        current_period_end: Option<DateTime<Utc>>,
    ) -> Result<Option<SubscriptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_subscription_status");
        let result = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            UPDATE subscriptions
            SET status = $2,
                current_period_end = COALESCE($3, current_period_end)
            WHERE stripe_subscription_id = $1
            RETURNING id, user_id, stripe_customer_id, stripe_subscription_id, plan, status,
                      current_period_end, created_at, updated_at
            "#,
        )
        .bind(stripe_subscription_id)
        .bind(status)
        .bind(current_period_end)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The user's most recent subscription that still grants access.
    pub async fn find_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SubscriptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_subscription");
        let result = sqlx::query_as::<_, SubscriptionEntity>(
            r#"
            SELECT id, user_id, stripe_customer_id, stripe_subscription_id, plan, status,
                   current_period_end, created_at, updated_at
            FROM subscriptions
            WHERE user_id = $1 AND status IN ('active', 'trialing')
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
