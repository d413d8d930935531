//! Video domain models and embed provider detection.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Which provider renders a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    Youtube,
    Vimeo,
    Dailymotion,
    Mux,
    Direct,
}

impl EmbedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedType::Youtube => "youtube",
            EmbedType::Vimeo => "vimeo",
            EmbedType::Dailymotion => "dailymotion",
            EmbedType::Mux => "mux",
            EmbedType::Direct => "direct",
        }
    }
}

impl FromStr for EmbedType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(EmbedType::Youtube),
            "vimeo" => Ok(EmbedType::Vimeo),
            "dailymotion" => Ok(EmbedType::Dailymotion),
            "mux" => Ok(EmbedType::Mux),
            "direct" => Ok(EmbedType::Direct),
            _ => Err(format!("Invalid embed type: {}", s)),
        }
    }
}

impl fmt::Display for EmbedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing state of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Pending,
    Uploading,
    Processing,
    Ready,
    Errored,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Uploading => "uploading",
            VideoStatus::Processing => "processing",
            VideoStatus::Ready => "ready",
            VideoStatus::Errored => "errored",
        }
    }

    pub fn is_playable(&self) -> bool {
        matches!(self, VideoStatus::Ready)
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VideoStatus::Pending),
            "uploading" => Ok(VideoStatus::Uploading),
            "processing" => Ok(VideoStatus::Processing),
            "ready" => Ok(VideoStatus::Ready),
            "errored" => Ok(VideoStatus::Errored),
            _ => Err(format!("Invalid video status: {}", s)),
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmbedError {
    #[error("Video URL must start with http:// or https://")]
    InvalidScheme,

    #[error("Unsupported video URL")]
    Unsupported,

    #[error("Could not find a video id in the {0} URL")]
    MissingId(EmbedType),
}

lazy_static! {
    static ref YOUTUBE_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap();
    static ref VIMEO_ID: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref ALNUM_ID: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
}

const DIRECT_EXTENSIONS: [&str; 4] = [".mp4", ".webm", ".m3u8", ".mov"];

/// A recognised video source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSource {
    pub embed_type: EmbedType,
    /// Provider id; `None` for direct files.
    pub external_id: Option<String>,
    pub source_url: String,
}

impl EmbedSource {
    /// Source for a Mux playback id.
    pub fn mux(playback_id: &str) -> Self {
        Self {
            embed_type: EmbedType::Mux,
            external_id: Some(playback_id.to_string()),
            source_url: format!("https://stream.mux.com/{}.m3u8", playback_id),
        }
    }

    /// URL the client player loads.
    pub fn embed_url(&self) -> String {
        let id = self.external_id.as_deref().unwrap_or_default();
        match self.embed_type {
            EmbedType::Youtube => format!("https://www.youtube.com/embed/{}", id),
            EmbedType::Vimeo => format!("https://player.vimeo.com/video/{}", id),
            EmbedType::Dailymotion => format!("https://www.dailymotion.com/embed/video/{}", id),
            EmbedType::Mux => format!("https://stream.mux.com/{}.m3u8", id),
            EmbedType::Direct => self.source_url.clone(),
        }
    }

    /// Provider thumbnail, where the provider has a predictable one.
    pub fn default_thumbnail(&self) -> Option<String> {
        let id = self.external_id.as_deref()?;
        match self.embed_type {
            EmbedType::Youtube => Some(format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id)),
            EmbedType::Dailymotion => {
                Some(format!("https://www.dailymotion.com/thumbnail/video/{}", id))
            }
            EmbedType::Mux => Some(format!("https://image.mux.com/{}/thumbnail.jpg", id)),
            EmbedType::Vimeo | EmbedType::Direct => None,
        }
    }
}

/// Works out the provider and id for a pasted video URL.
pub fn detect_embed(raw: &str) -> Result<EmbedSource, EmbedError> {
    let url = raw.trim();
    let lower = url.to_ascii_lowercase();
    let rest = if lower.starts_with("https://") {
        &url[8..]
    } else if lower.starts_with("http://") {
        &url[7..]
    } else {
        return Err(EmbedError::InvalidScheme);
    };

    let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let host = rest[..host_end].to_ascii_lowercase();
    let host = host.split(':').next().unwrap_or_default();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);

    let tail = &rest[host_end..];
    let tail = tail.split('#').next().unwrap_or_default();
    let (path, query) = match tail.split_once('?') {
        Some((p, q)) => (p, q),
        None => (tail, ""),
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let found = |embed_type: EmbedType, id: Option<&str>, pattern: &Regex| {
        match id {
            Some(id) if pattern.is_match(id) => Ok(EmbedSource {
                embed_type,
                external_id: Some(id.to_string()),
                source_url: url.to_string(),
            }),
            _ => Err(EmbedError::MissingId(embed_type)),
        }
    };

    match host {
        "youtube.com" | "music.youtube.com" | "youtube-nocookie.com" => {
            let id = match segments.as_slice() {
                ["watch", ..] => query_param(query, "v"),
                ["embed" | "shorts" | "live" | "v", id, ..] => Some(*id),
                _ => None,
            };
            found(EmbedType::Youtube, id, &*YOUTUBE_ID)
        }
        "youtu.be" => found(EmbedType::Youtube, segments.first().copied(), &*YOUTUBE_ID),
        "vimeo.com" => {
            let id = segments.iter().copied().find(|s| VIMEO_ID.is_match(s));
            found(EmbedType::Vimeo, id, &*VIMEO_ID)
        }
        "player.vimeo.com" => {
            let id = match segments.as_slice() {
                ["video", id, ..] => Some(*id),
                _ => None,
            };
            found(EmbedType::Vimeo, id, &*VIMEO_ID)
        }
        "dailymotion.com" => {
            let id = match segments.as_slice() {
                ["video", id, ..] | ["embed", "video", id, ..] => id.split('_').next(),
                _ => None,
            };
            found(EmbedType::Dailymotion, id, &*ALNUM_ID)
        }
        "dai.ly" => found(EmbedType::Dailymotion, segments.first().copied(), &*ALNUM_ID),
        "stream.mux.com" => {
            let id = segments
                .first()
                .map(|s| s.strip_suffix(".m3u8").unwrap_or(*s));
            found(EmbedType::Mux, id, &*ALNUM_ID)
        }
        _ => {
            let path_lower = path.to_ascii_lowercase();
            if !host.is_empty() && DIRECT_EXTENSIONS.iter().any(|ext| path_lower.ends_with(ext)) {
                Ok(EmbedSource {
                    embed_type: EmbedType::Direct,
                    external_id: None,
                    source_url: url.to_string(),
                })
            } else {
                Err(EmbedError::Unsupported)
            }
        }
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| match pair.split_once('=') {
        Some((k, v)) if k == name => Some(v),
        _ => None,
    })
}

/// A video placed in a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub embed_type: EmbedType,
    pub source_url: Option<String>,
    pub external_id: Option<String>,
    pub embed_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_secs: Option<i32>,
    pub position: i32,
    pub status: VideoStatus,
    pub mux_playback_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for adding an embedded video to a channel.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddVideoRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be between 1 and 2048 characters"))]
    pub url: String,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_web_url"))]
    pub thumbnail_url: Option<String>,

    #[validate(range(min = 0, max = 86400, message = "Duration must be between 0 and 86400 seconds"))]
    pub duration_secs: Option<i32>,
}

/// Request payload for reordering a channel's playlist.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderVideosRequest {
    pub video_ids: Vec<Uuid>,
}

/// Request payload for starting a direct upload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUploadRequest {
    pub channel_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Response after starting a direct upload.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUploadResponse {
    pub video_id: Uuid,
    pub upload_id: String,
    pub upload_url: String,
}
