//! Payment gateway abstraction.
//!
//! Checkout is delegated to a hosted payment page; the gateway only has to
//! open a session and hand back its URL.

use uuid::Uuid;

use crate::models::billing::PlanId;

/// Errors raised while talking to the payment provider.
#[derive(Debug, thiserror::Error)]
pub enum PaymentGatewayError {
    #[error("Payment gateway is not configured")]
    NotConfigured,

    #[error("No price configured for plan {0}")]
    MissingPrice(PlanId),

    #[error("Payment provider request failed: {0}")]
    Request(String),

    #[error("Unexpected payment provider response: {0}")]
    InvalidResponse(String),
}

/// What the checkout handler asks the gateway for.
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub plan: PlanId,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a subscription checkout session for the given plan.
    async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymentGatewayError>;
}

/// Mock gateway for development and testing.
///
/// Returns a deterministic session derived from the user and plan.
#[derive(Debug, Clone, Default)]
pub struct MockPaymentGateway {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        if self.simulate_failure {
            tracing::warn!(
                user_id = %params.user_id,
                plan = %params.plan,
                "Mock payment gateway simulating failure"
            );
            return Err(PaymentGatewayError::Request("Simulated failure".to_string()));
        }

        let id = format!("cs_mock_{}_{}", params.plan, params.user_id.simple());
        tracing::info!(
            user_id = %params.user_id,
            plan = %params.plan,
            session_id = %id,
            "Mock: Would create checkout session"
        );

        Ok(CheckoutSession {
            url: format!("https://checkout.mock.local/pay/{}", id),
            id,
        })
    }
}
