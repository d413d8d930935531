//! AI channel suggestion handlers.

use axum::{
    extract::{Path, Query},
    Json,
};
use chrono::{Timelike, Utc};
use domain::services::ai_channels::{self, AiChannel, ScoredChannel, TimeOfDay};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
    /// Caller's local hour (0-23); server UTC hour when absent.
    pub hour: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub query: String,
    pub time_of_day: TimeOfDay,
    pub data: Vec<ScoredChannel>,
}

/// GET /api/ai-channels?q=&hour=
pub async fn suggest_channels(
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let hour = match query.hour {
        Some(h) if h > 23 => {
            return Err(ApiError::Validation(
                "hour: must be between 0 and 23".to_string(),
            ))
        }
        Some(h) => h,
        None => Utc::now().hour(),
    };

    Ok(Json(SuggestResponse {
        data: ai_channels::suggest(&query.q, hour),
        time_of_day: TimeOfDay::from_hour(hour),
        query: query.q.trim().to_string(),
    }))
}

/// GET /api/ai-channels/:slug
pub async fn get_ai_channel(Path(slug): Path<String>) -> Result<Json<&'static AiChannel>, ApiError> {
    ai_channels::find(&slug)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("AI channel not found".to_string()))
}
