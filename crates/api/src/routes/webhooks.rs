//! Provider webhook receivers.
//!
//! Both providers sign `"{t}.{body}"` with HMAC-SHA256, so the raw body is
//! verified before anything is parsed. Deliveries are acknowledged with 200
//! once handled or deliberately ignored; only storage failures return 500,
//! which makes the provider retry.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use domain::models::billing::{PlanId, SubscriptionStatus};
use domain::models::provider_event::{
    CheckoutSessionObject, InvoiceObject, MuxAssetData, MuxEvent, MuxUploadData, StripeEvent,
    SubscriptionObject,
};
use persistence::repositories::{ProfileRepository, SubscriptionRepository, VideoRepository};
use serde::{de::DeserializeOwned, Serialize};
use shared::crypto::verify_timestamped_signature;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_webhook_event;

pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";
pub const MUX_SIGNATURE_HEADER: &str = "mux-signature";

/// Acknowledgement body.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub handled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Handled,
    Ignored,
}

impl Outcome {
    fn as_str(&self) -> &'static str {
        match self {
            Outcome::Handled => "handled",
            Outcome::Ignored => "ignored",
        }
    }
}

fn verify_signature(
    headers: &HeaderMap,
    header_name: &str,
    body: &[u8],
    secret: &str,
    tolerance_secs: i64,
) -> Result<(), ApiError> {
    if secret.is_empty() {
        return Err(ApiError::ServiceUnavailable(
            "Webhook secret is not configured".to_string(),
        ));
    }

    let header = headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {} header", header_name)))?;

    verify_timestamped_signature(header, body, secret, tolerance_secs, Utc::now().timestamp())
        .map_err(|e| {
            warn!(header = header_name, error = %e, "Webhook signature rejected");
            ApiError::BadRequest(format!("Invalid signature: {}", e))
        })
}

fn parse_object<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::BadRequest(format!("Malformed {} payload: {}", what, e)))
}

fn ack(provider: &'static str, event_type: &str, outcome: Outcome) -> Json<WebhookAck> {
    record_webhook_event(provider, event_type, outcome.as_str());
    Json(WebhookAck {
        received: true,
        handled: outcome == Outcome::Handled,
    })
}

/// POST /api/webhooks/stripe
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    verify_signature(
        &headers,
        STRIPE_SIGNATURE_HEADER,
        &body,
        &state.config.stripe.webhook_secret,
        state.config.security.webhook_tolerance_secs,
    )?;

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed event: {}", e)))?;

    info!(event_id = %event.id, event_type = %event.event_type, "Stripe webhook received");

    let outcome = match event.event_type.as_str() {
        "checkout.session.completed" => {
            checkout_completed(&state, parse_object(event.data.object, "checkout session")?)
                .await?
        }
        "customer.subscription.created" | "customer.subscription.updated" => {
            subscription_updated(&state, parse_object(event.data.object, "subscription")?).await?
        }
        "customer.subscription.deleted" => {
            subscription_deleted(&state, parse_object(event.data.object, "subscription")?).await?
        }
        "invoice.payment_failed" => {
            payment_failed(&state, parse_object(event.data.object, "invoice")?).await?
        }
        other => {
            debug!(event_type = other, "Ignoring Stripe event");
            Outcome::Ignored
        }
    };

    Ok(ack("stripe", &event.event_type, outcome))
}

async fn checkout_completed(
    state: &AppState,
    session: CheckoutSessionObject,
) -> Result<Outcome, ApiError> {
    let Some(user_id) = session
        .user_reference()
        .and_then(|r| Uuid::parse_str(r).ok())
    else {
        warn!(session_id = %session.id, "Checkout session has no usable user reference");
        return Ok(Outcome::Ignored);
    };

    let plan = session
        .metadata
        .get("plan")
        .and_then(|p| p.parse::<PlanId>().ok())
        .unwrap_or(PlanId::Premium);

    let profiles = ProfileRepository::new(state.pool.clone());
    profiles.ensure_exists(user_id, None).await?;

    if let Some(subscription_id) = session.subscription.as_deref() {
        SubscriptionRepository::new(state.pool.clone())
            .upsert_from_checkout(
                user_id,
                session.customer.as_deref(),
                subscription_id,
                plan.as_str(),
                SubscriptionStatus::Active.as_str(),
            )
            .await?;
    }

    profiles.set_premium(user_id, true).await?;
    if let Some(customer) = session.customer.as_deref() {
        profiles.set_stripe_customer(user_id, customer).await?;
    }
    if plan == PlanId::Creator {
        profiles.mark_creator(user_id).await?;
    }

    info!(user_id = %user_id, plan = %plan, session_id = %session.id, "Checkout completed");
    Ok(Outcome::Handled)
}

async fn subscription_updated(
    state: &AppState,
    subscription: SubscriptionObject,
) -> Result<Outcome, ApiError> {
    let Ok(status) = subscription.status.parse::<SubscriptionStatus>() else {
        warn!(
            subscription_id = %subscription.id,
            status = %subscription.status,
            "Unknown subscription status"
        );
        return Ok(Outcome::Ignored);
    };
    let period_end = subscription
        .current_period_end
        .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

    apply_status(state, &subscription.id, status, period_end).await
}

async fn subscription_deleted(
    state: &AppState,
    subscription: SubscriptionObject,
) -> Result<Outcome, ApiError> {
    apply_status(state, &subscription.id, SubscriptionStatus::Canceled, None).await
}

async fn payment_failed(state: &AppState, invoice: InvoiceObject) -> Result<Outcome, ApiError> {
    let Some(subscription_id) = invoice.subscription.as_deref() else {
        debug!(invoice_id = %invoice.id, "Invoice without subscription");
        return Ok(Outcome::Ignored);
    };

    let updated = SubscriptionRepository::new(state.pool.clone())
        .update_status(subscription_id, SubscriptionStatus::PastDue.as_str(), None)
        .await?;

    match updated {
        Some(row) => {
            info!(user_id = %row.user_id, subscription_id, "Subscription past due");
            Ok(Outcome::Handled)
        }
        None => {
            warn!(subscription_id, "Payment failed for unknown subscription");
            Ok(Outcome::Ignored)
        }
    }
}

/// Stores the new status and syncs the owner's premium flag.
async fn apply_status(
    state: &AppState,
    subscription_id: &str,
    status: SubscriptionStatus,
    period_end: Option<DateTime<Utc>>,
) -> Result<Outcome, ApiError> {
    let updated = SubscriptionRepository::new(state.pool.clone())
        .update_status(subscription_id, status.as_str(), period_end)
        .await?;

    let Some(row) = updated else {
        warn!(subscription_id, status = %status, "Status change for unknown subscription");
        return Ok(Outcome::Ignored);
    };

    ProfileRepository::new(state.pool.clone())
        .set_premium(row.user_id, status.grants_premium())
        .await?;

    info!(
        user_id = %row.user_id,
        subscription_id,
        status = %status,
        premium = status.grants_premium(),
        "Subscription status updated"
    );
    Ok(Outcome::Handled)
}

/// POST /api/webhooks/mux
pub async fn mux_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    verify_signature(
        &headers,
        MUX_SIGNATURE_HEADER,
        &body,
        &state.config.mux.webhook_secret,
        state.config.security.webhook_tolerance_secs,
    )?;

    let event: MuxEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed event: {}", e)))?;

    info!(
        event_id = event.id.as_deref().unwrap_or("-"),
        event_type = %event.event_type,
        "Mux webhook received"
    );

    let videos = VideoRepository::new(state.pool.clone());
    let outcome = match event.event_type.as_str() {
        "video.upload.asset_created" => {
            let upload: MuxUploadData = parse_object(event.data, "upload")?;
            match upload.asset_id.as_deref() {
                Some(asset_id) => found(
                    videos.attach_asset_by_upload(&upload.id, asset_id).await?,
                    "processing",
                ),
                None => Outcome::Ignored,
            }
        }
        "video.asset.ready" => {
            let asset: MuxAssetData = parse_object(event.data, "asset")?;
            let duration_secs = asset.duration.map(|d| d.round() as i32);
            found(
                videos
                    .mark_ready(
                        passthrough_id(asset.passthrough.as_deref()),
                        &asset.id,
                        asset.public_playback_id(),
                        duration_secs,
                    )
                    .await?,
                "ready",
            )
        }
        "video.asset.errored" => {
            let asset: MuxAssetData = parse_object(event.data, "asset")?;
            found(
                videos
                    .mark_errored_by_asset(passthrough_id(asset.passthrough.as_deref()), &asset.id)
                    .await?,
                "errored",
            )
        }
        "video.upload.cancelled" | "video.upload.errored" => {
            let upload: MuxUploadData = parse_object(event.data, "upload")?;
            found(videos.mark_errored_by_upload(&upload.id).await?, "errored")
        }
        other => {
            debug!(event_type = other, "Ignoring Mux event");
            Outcome::Ignored
        }
    };

    Ok(ack("mux", &event.event_type, outcome))
}

fn passthrough_id(passthrough: Option<&str>) -> Option<Uuid> {
    passthrough.and_then(|p| Uuid::parse_str(p).ok())
}

fn found(video_id: Option<Uuid>, status: &str) -> Outcome {
    match video_id {
        Some(video_id) => {
            info!(video_id = %video_id, status, "Video status updated");
            Outcome::Handled
        }
        None => {
            warn!(status, "Mux event matched no video");
            Outcome::Ignored
        }
    }
}
