//! Channel endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::channel::{
    generate_slug, ChannelDetail, CreateChannelRequest, ListChannelsQuery, ListChannelsResponse,
    UpdateChannelRequest,
};
use domain::models::{Channel, ContentCategory, ShieldPreset, Video};
use persistence::entities::ChannelEntity;
use persistence::repositories::{
    ChannelChanges, ChannelListFilter, ChannelRepository, FollowRepository, NewChannel,
    ProfileRepository, VideoRepository,
};
use shared::pagination::PageParams;
use std::collections::BTreeSet;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, OptionalUserAuth, UserAuth};

/// Loads a channel the caller may see.
///
/// Unpublished channels only exist for their owner.
pub(crate) async fn visible_channel(
    state: &AppState,
    channel_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<ChannelEntity, ApiError> {
    let channel = ChannelRepository::new(state.pool.clone())
        .find_by_id(channel_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    if !channel.is_published && viewer != Some(channel.owner_id) {
        return Err(ApiError::NotFound("Channel not found".to_string()));
    }
    Ok(channel)
}

/// Loads a channel the caller owns.
pub(crate) async fn owned_channel(
    state: &AppState,
    channel_id: Uuid,
    user_id: Uuid,
) -> Result<ChannelEntity, ApiError> {
    let channel = ChannelRepository::new(state.pool.clone())
        .find_by_id(channel_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    if channel.owner_id != user_id {
        return Err(ApiError::Forbidden(
            "Only the channel owner can do this".to_string(),
        ));
    }
    Ok(channel)
}

/// Tags the listing should hide for this caller.
///
/// An explicit `shield` preset wins; otherwise a signed-in caller's saved
/// settings apply.
async fn listing_blocklist(
    state: &AppState,
    shield: Option<&str>,
    viewer: Option<Uuid>,
) -> Result<Vec<String>, ApiError> {
    let blocklist: BTreeSet<ContentCategory> = match (shield, viewer) {
        (Some(preset), _) => {
            let preset: ShieldPreset = preset
                .parse()
                .map_err(|e: String| ApiError::Validation(format!("shield: {}", e)))?;
            preset.blocked().iter().copied().collect()
        }
        (None, Some(user_id)) => ProfileRepository::new(state.pool.clone())
            .find_by_id(user_id)
            .await?
            .map(|p| p.shield_settings().blocklist())
            .unwrap_or_default(),
        (None, None) => Default::default(),
    };

    Ok(blocklist.iter().map(|c| c.as_str().to_string()).collect())
}

/// List published channels.
///
/// GET /api/channels
pub async fn list_channels(
    State(state): State<AppState>,
    auth: OptionalUserAuth,
    Query(query): Query<ListChannelsQuery>,
) -> Result<Json<ListChannelsResponse>, ApiError> {
    let page = PageParams {
        limit: query.limit,
        offset: query.offset,
    };
    let blocked_tags = listing_blocklist(&state, query.shield.as_deref(), auth.user_id()).await?;

    let filter = ChannelListFilter {
        search: query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string),
        category: query.category.clone().filter(|c| !c.is_empty()),
        blocked_tags,
        sort: query.sort,
        limit: page.limit(),
        offset: page.offset(),
    };

    let channels: Vec<Channel> = ChannelRepository::new(state.pool.clone())
        .list(&filter)
        .await?
        .into_iter()
        .map(Channel::from)
        .collect();

    Ok(Json(ListChannelsResponse {
        count: channels.len(),
        data: channels,
        limit: filter.limit,
        offset: filter.offset,
    }))
}

/// Create a channel owned by the caller.
///
/// POST /api/channels
pub async fn create_channel(
    State(state): State<AppState>,
    auth: UserAuth,
    JsonBody(request): JsonBody<CreateChannelRequest>,
) -> Result<(StatusCode, Json<Channel>), ApiError> {
    request.validate()?;

    let profiles = ProfileRepository::new(state.pool.clone());
    profiles
        .ensure_exists(auth.user_id, auth.email.as_deref())
        .await?;

    let repo = ChannelRepository::new(state.pool.clone());
    let slug = repo
        .generate_unique_slug(&generate_slug(request.name.trim()))
        .await?;

    let entity = repo
        .create(NewChannel {
            owner_id: auth.user_id,
            name: request.name.trim(),
            slug: &slug,
            description: request.description.as_deref(),
            thumbnail_url: request.thumbnail_url.as_deref(),
            category: request.category.as_deref(),
            content_tags: &request.content_tags,
            is_premium: request.is_premium,
            is_published: request.is_published,
        })
        .await?;

    profiles.mark_creator(auth.user_id).await?;

    info!(
        channel_id = %entity.id,
        owner_id = %auth.user_id,
        slug = %entity.slug,
        "Channel created"
    );

    Ok((StatusCode::CREATED, Json(entity.into())))
}

/// Channel detail with its playlist.
///
/// GET /api/channels/:channel_id
pub async fn get_channel(
    State(state): State<AppState>,
    auth: OptionalUserAuth,
    Path(channel_id): Path<Uuid>,
) -> Result<Json<ChannelDetail>, ApiError> {
    let viewer = auth.user_id();
    let channel = visible_channel(&state, channel_id, viewer).await?;

    let videos: Vec<Video> = VideoRepository::new(state.pool.clone())
        .list_by_channel(channel_id)
        .await?
        .into_iter()
        .map(Video::from)
        .collect();

    let is_following = match viewer {
        Some(user_id) => {
            FollowRepository::new(state.pool.clone())
                .is_following(user_id, channel_id)
                .await?
        }
        None => false,
    };
    let is_owner = viewer == Some(channel.owner_id);

    // A lost view count is not worth failing the page for.
    if let Err(e) = ChannelRepository::new(state.pool.clone())
        .increment_views(channel_id)
        .await
    {
        warn!(channel_id = %channel_id, error = %e, "Failed to count channel view");
    }

    Ok(Json(ChannelDetail {
        channel: channel.into(),
        videos,
        is_following,
        is_owner,
    }))
}

/// Update a channel.
///
/// PATCH /api/channels/:channel_id
pub async fn update_channel(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(channel_id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateChannelRequest>,
) -> Result<Json<Channel>, ApiError> {
    request.validate()?;
    owned_channel(&state, channel_id, auth.user_id).await?;

    let changes = ChannelChanges {
        name: request.name.as_deref().map(str::trim),
        description: request.description.as_deref(),
        thumbnail_url: request.thumbnail_url.as_deref(),
        category: request.category.as_deref(),
        content_tags: request.content_tags.as_deref(),
        is_premium: request.is_premium,
        is_published: request.is_published,
    };

    let entity = ChannelRepository::new(state.pool.clone())
        .update(channel_id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;

    info!(channel_id = %channel_id, "Channel updated");

    Ok(Json(entity.into()))
}

/// Delete a channel with its videos.
///
/// DELETE /api/channels/:channel_id
pub async fn delete_channel(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(channel_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    owned_channel(&state, channel_id, auth.user_id).await?;

    let deleted = ChannelRepository::new(state.pool.clone())
        .delete(channel_id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Channel not found".to_string()));
    }

    info!(channel_id = %channel_id, owner_id = %auth.user_id, "Channel deleted");

    Ok(StatusCode::NO_CONTENT)
}
