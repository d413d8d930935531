//! Feedback submission handler.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::feedback::{
    check_message_length, MessageLengthError, SubmitFeedbackRequest, SubmitFeedbackResponse,
    MAX_MESSAGE_CHARS, MIN_MESSAGE_CHARS,
};
use persistence::repositories::{FeedbackRepository, ProfileRepository};
use shared::sanitize::sanitize_text;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ClientKey, JsonBody, OptionalUserAuth};
use crate::middleware::metrics::record_feedback_submitted;

/// Store product feedback.
///
/// Rate limiting happens in the route layer; this handler sanitizes the
/// message and enforces its length on the sanitized text.
///
/// POST /api/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    auth: OptionalUserAuth,
    client: ClientKey,
    JsonBody(request): JsonBody<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<SubmitFeedbackResponse>), ApiError> {
    request.validate()?;

    let message = sanitize_text(&request.message);
    check_message_length(&message).map_err(|e| match e {
        MessageLengthError::TooShort => ApiError::Validation(format!(
            "message: must be at least {} characters",
            MIN_MESSAGE_CHARS
        )),
        MessageLengthError::TooLong => ApiError::Validation(format!(
            "message: must be at most {} characters",
            MAX_MESSAGE_CHARS
        )),
    })?;

    let page_url = request
        .page_url
        .as_deref()
        .map(sanitize_text)
        .filter(|u| !u.is_empty());

    let user_id = auth.user_id();
    if let Some(auth) = auth.0.as_ref() {
        ProfileRepository::new(state.pool.clone())
            .ensure_exists(auth.user_id, auth.email.as_deref())
            .await?;
    }

    let entity = FeedbackRepository::new(state.pool.clone())
        .create(
            user_id,
            request.category.as_str(),
            &message,
            page_url.as_deref(),
            &client.hash,
        )
        .await?;

    record_feedback_submitted(request.category.as_str());
    info!(
        feedback_id = %entity.id,
        category = request.category.as_str(),
        signed_in = user_id.is_some(),
        "Feedback received"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            id: entity.id,
            received: true,
        }),
    ))
}
