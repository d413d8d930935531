//! Stripe Checkout client.
//!
//! Opens hosted subscription checkout sessions through the Stripe REST API.
//! Requests are form-encoded and authenticated with the secret key.

use domain::models::billing::PlanId;
use domain::services::{
    CheckoutSession, CheckoutSessionParams, PaymentGateway, PaymentGatewayError,
};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::StripeConfig;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// [`PaymentGateway`] backed by Stripe Checkout.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    config: StripeConfig,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.config.api_base)
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentGatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PaymentGatewayError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        !self.config.secret_key.is_empty()
    }

    fn price_for(&self, plan: PlanId) -> Result<&str, PaymentGatewayError> {
        let price = match plan {
            PlanId::Premium => self.config.premium_price_id.as_str(),
            PlanId::Creator => self.config.creator_price_id.as_str(),
            PlanId::Free => "",
        };
        if price.is_empty() {
            Err(PaymentGatewayError::MissingPrice(plan))
        } else {
            Ok(price)
        }
    }

    fn sessions_url(&self) -> String {
        format!(
            "{}/v1/checkout/sessions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

/// Form fields for `POST /v1/checkout/sessions`.
fn session_form(params: &CheckoutSessionParams, price: &str) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", price.to_string()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", params.success_url.clone()),
        ("cancel_url", params.cancel_url.clone()),
        ("client_reference_id", params.user_id.to_string()),
        ("metadata[user_id]", params.user_id.to_string()),
        ("metadata[plan]", params.plan.as_str().to_string()),
    ];
    if let Some(email) = params.email.as_deref().filter(|e| !e.is_empty()) {
        form.push(("customer_email", email.to_string()));
    }
    form
}

#[async_trait::async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymentGatewayError> {
        if !self.is_configured() {
            return Err(PaymentGatewayError::NotConfigured);
        }
        let price = self.price_for(params.plan)?;

        let response = self
            .client
            .post(self.sessions_url())
            .bearer_auth(&self.config.secret_key)
            .form(&session_form(&params, price))
            .send()
            .await
            .map_err(|e| PaymentGatewayError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<StripeErrorResponse>()
                .await
                .ok()
                .map(|e| {
                    format!(
                        "{}: {}",
                        e.error.kind.unwrap_or_default(),
                        e.error.message.unwrap_or_default()
                    )
                })
                .unwrap_or_default();
            warn!(status = %status, detail = %detail, "Stripe checkout session request failed");
            return Err(PaymentGatewayError::Request(format!("HTTP {}", status)));
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| PaymentGatewayError::InvalidResponse(e.to_string()))?;
        let url = session.url.ok_or_else(|| {
            PaymentGatewayError::InvalidResponse("session has no url".to_string())
        })?;

        debug!(session_id = %session.id, plan = %params.plan, "Created checkout session");
        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}
