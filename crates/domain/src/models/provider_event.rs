//! Webhook payloads sent by Stripe and Mux.
//!
//! Only the fields the handlers read are modelled; everything else in the
//! provider payloads is ignored by serde.

use serde::Deserialize;
use std::collections::HashMap;

/// Envelope of every Stripe event.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// `checkout.session.completed` object.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    pub client_reference_id: Option<String>,
    pub customer: Option<String>,
    pub subscription: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSessionObject {
    /// The LoopEasy user the session was opened for.
    pub fn user_reference(&self) -> Option<&str> {
        self.client_reference_id
            .as_deref()
            .or_else(|| self.metadata.get("user_id").map(String::as_str))
    }
}

/// `customer.subscription.*` object.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub customer: Option<String>,
    pub status: String,
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// `invoice.*` object.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceObject {
    pub id: String,
    pub subscription: Option<String>,
    pub customer: Option<String>,
}

/// Envelope of every Mux event.
#[derive(Debug, Clone, Deserialize)]
pub struct MuxEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub id: Option<String>,
    pub data: serde_json::Value,
}

/// `video.asset.*` data.
#[derive(Debug, Clone, Deserialize)]
pub struct MuxAssetData {
    pub id: String,
    pub status: Option<String>,
    pub duration: Option<f64>,
    pub passthrough: Option<String>,
    pub upload_id: Option<String>,
    #[serde(default)]
    pub playback_ids: Vec<MuxPlaybackId>,
}

impl MuxAssetData {
    /// First public playback id, falling back to the first one of any policy.
    pub fn public_playback_id(&self) -> Option<&str> {
        self.playback_ids
            .iter()
            .find(|p| p.policy.as_deref() == Some("public"))
            .or_else(|| self.playback_ids.first())
            .map(|p| p.id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MuxPlaybackId {
    pub id: String,
    pub policy: Option<String>,
}

/// `video.upload.*` data.
#[derive(Debug, Clone, Deserialize)]
pub struct MuxUploadData {
    pub id: String,
    pub asset_id: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub new_asset_settings: Option<MuxNewAssetSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MuxNewAssetSettings {
    pub passthrough: Option<String>,
}
