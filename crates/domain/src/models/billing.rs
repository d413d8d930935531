//! Plans, subscriptions and checkout payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Subscription plan identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Free,
    Premium,
    Creator,
}

impl PlanId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Free => "free",
            PlanId::Premium => "premium",
            PlanId::Creator => "creator",
        }
    }
}

impl FromStr for PlanId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(PlanId::Free),
            "premium" => Ok(PlanId::Premium),
            "creator" => Ok(PlanId::Creator),
            _ => Err(format!("Invalid plan: {}", s)),
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A plan as shown on the pricing page.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    pub price_cents: i64,
    pub interval: &'static str,
    pub features: &'static [&'static str],
    pub requires_checkout: bool,
}

pub static PLANS: [Plan; 3] = [
    Plan {
        id: PlanId::Free,
        name: "Free",
        price_cents: 0,
        interval: "month",
        features: &[
            "Browse and follow channels",
            "AI channel suggestions",
            "SoulShield filtering",
        ],
        requires_checkout: false,
    },
    Plan {
        id: PlanId::Premium,
        name: "Premium",
        price_cents: 499,
        interval: "month",
        features: &[
            "Everything in Free",
            "Premium channels",
            "No ads",
        ],
        requires_checkout: true,
    },
    Plan {
        id: PlanId::Creator,
        name: "Creator",
        price_cents: 999,
        interval: "month",
        features: &[
            "Everything in Premium",
            "Direct video uploads",
            "Revenue share dashboard",
        ],
        requires_checkout: true,
    },
];

/// Looks up a plan by id.
pub fn plan(id: PlanId) -> &'static Plan {
    match id {
        PlanId::Free => &PLANS[0],
        PlanId::Premium => &PLANS[1],
        PlanId::Creator => &PLANS[2],
    }
}

/// Subscription states as reported by Stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Incomplete,
    IncompleteExpired,
    Trialing,
    Active,
    PastDue,
    Canceled,
    Unpaid,
    Paused,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Paused => "paused",
        }
    }

    /// Whether a subscription in this state unlocks premium content.
    pub fn grants_premium(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(SubscriptionStatus::Incomplete),
            "incomplete_expired" => Ok(SubscriptionStatus::IncompleteExpired),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            "unpaid" => Ok(SubscriptionStatus::Unpaid),
            "paused" => Ok(SubscriptionStatus::Paused),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's Stripe subscription.
#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: PlanId,
    pub status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response for GET /api/plans.
#[derive(Debug, Clone, Serialize)]
pub struct PlansResponse {
    pub plans: &'static [Plan],
}

/// Request payload for POST /api/checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub plan: PlanId,
}

/// Response for POST /api/checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}
