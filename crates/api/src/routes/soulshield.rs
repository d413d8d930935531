//! SoulShield catalogue and check handlers.

use axum::Json;
use domain::models::soulshield::{
    blocked_tags, effective_blocklist, PresetsResponse, ShieldCheckRequest, ShieldCheckResponse,
};

use crate::extractors::JsonBody;

/// GET /api/soulshield/presets
pub async fn list_presets() -> Json<PresetsResponse> {
    Json(PresetsResponse::catalogue())
}

/// Whether content with `tags` passes the given preset and custom blocks.
///
/// POST /api/soulshield/check
pub async fn check_content(
    JsonBody(request): JsonBody<ShieldCheckRequest>,
) -> Json<ShieldCheckResponse> {
    let blocklist = effective_blocklist(request.preset, &request.custom);
    let mut blocked = blocked_tags(&request.tags, &blocklist);
    blocked.sort();
    blocked.dedup();

    Json(ShieldCheckResponse {
        allowed: blocked.is_empty(),
        blocked_tags: blocked,
    })
}
