//! Plan catalogue and checkout handlers.

use axum::{extract::State, Json};
use domain::models::billing::{plan, CheckoutRequest, CheckoutResponse, PlansResponse, PLANS};
use domain::services::CheckoutSessionParams;
use persistence::repositories::{ProfileRepository, SubscriptionRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, UserAuth};

/// GET /api/plans
pub async fn list_plans() -> Json<PlansResponse> {
    Json(PlansResponse { plans: &PLANS })
}

fn app_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Open a hosted checkout for a paid plan.
///
/// POST /api/checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    auth: UserAuth,
    JsonBody(request): JsonBody<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    if !plan(request.plan).requires_checkout {
        return Err(ApiError::Validation(format!(
            "plan: {} does not need checkout",
            request.plan
        )));
    }

    let profile = ProfileRepository::new(state.pool.clone())
        .ensure_exists(auth.user_id, auth.email.as_deref())
        .await?;

    let active = SubscriptionRepository::new(state.pool.clone())
        .find_active_for_user(auth.user_id)
        .await?;
    if let Some(active) = active {
        if active.plan == request.plan.as_str() {
            return Err(ApiError::Conflict(format!(
                "Already subscribed to the {} plan",
                request.plan
            )));
        }
    }

    let base = &state.config.server.app_base_url;
    let params = CheckoutSessionParams {
        user_id: auth.user_id,
        email: auth.email.clone().or(profile.email),
        plan: request.plan,
        success_url: app_url(base, &state.config.stripe.success_path),
        cancel_url: app_url(base, &state.config.stripe.cancel_path),
    };

    let session = state.payments.create_checkout_session(params).await?;

    info!(
        user_id = %auth.user_id,
        plan = %request.plan,
        session_id = %session.id,
        "Checkout session created"
    );

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}
