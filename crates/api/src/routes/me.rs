//! Endpoints scoped to the signed-in caller.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::earnings::{Earning, EarningsResponse, EarningsSummary};
use domain::models::profile::UpdateProfileRequest;
use domain::models::soulshield::UpdateShieldRequest;
use domain::models::{Channel, Profile};
use persistence::repositories::{
    ChannelRepository, EarningsRepository, FollowRepository, ProfileRepository,
};
use shared::pagination::PageParams;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, UserAuth};

/// The caller's profile, created on first access.
///
/// GET /api/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Profile>, ApiError> {
    let entity = ProfileRepository::new(state.pool.clone())
        .ensure_exists(auth.user_id, auth.email.as_deref())
        .await?;
    Ok(Json(entity.into()))
}

/// Update editable profile fields.
///
/// PATCH /api/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: UserAuth,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    request.validate()?;

    let repo = ProfileRepository::new(state.pool.clone());
    repo.ensure_exists(auth.user_id, auth.email.as_deref()).await?;

    let entity = repo
        .update(
            auth.user_id,
            request.username.as_deref().map(str::trim),
            request.display_name.as_deref().map(str::trim),
            request.avatar_url.as_deref(),
            request.bio.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    info!(user_id = %auth.user_id, "Profile updated");

    Ok(Json(entity.into()))
}

/// Save SoulShield settings.
///
/// PUT /api/me/soulshield
pub async fn update_soulshield(
    State(state): State<AppState>,
    auth: UserAuth,
    JsonBody(request): JsonBody<UpdateShieldRequest>,
) -> Result<Json<Profile>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    repo.ensure_exists(auth.user_id, auth.email.as_deref()).await?;

    let mut custom: Vec<String> = request
        .custom
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();
    custom.sort();
    custom.dedup();

    let entity = repo
        .set_soulshield(auth.user_id, request.preset.as_str(), &custom)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    info!(
        user_id = %auth.user_id,
        preset = %request.preset,
        custom = custom.len(),
        "SoulShield settings saved"
    );

    Ok(Json(entity.into()))
}

/// Channels the caller follows.
///
/// GET /api/me/following
pub async fn list_following(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<Channel>>, ApiError> {
    let channels = FollowRepository::new(state.pool.clone())
        .list_followed_channels(auth.user_id)
        .await?
        .into_iter()
        .map(Channel::from)
        .collect();
    Ok(Json(channels))
}

/// The caller's own channels, published or not.
///
/// GET /api/me/channels
pub async fn list_my_channels(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<Channel>>, ApiError> {
    let channels = ChannelRepository::new(state.pool.clone())
        .list_by_owner(auth.user_id)
        .await?
        .into_iter()
        .map(Channel::from)
        .collect();
    Ok(Json(channels))
}

/// Creator earnings with totals.
///
/// GET /api/me/earnings
pub async fn get_earnings(
    State(state): State<AppState>,
    auth: UserAuth,
    Query(page): Query<PageParams>,
) -> Result<Json<EarningsResponse>, ApiError> {
    let repo = EarningsRepository::new(state.pool.clone());

    let data: Vec<Earning> = repo
        .list_for_creator(auth.user_id, page.limit(), page.offset())
        .await?
        .into_iter()
        .map(Earning::from)
        .collect();
    let summary: EarningsSummary = repo.summary_for_creator(auth.user_id).await?.into();

    Ok(Json(EarningsResponse { summary, data }))
}
