//! Video entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::video::{EmbedSource, EmbedType, VideoStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the videos table.
#[derive(Debug, Clone, FromRow)]
pub struct VideoEntity {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub embed_type: String,
    pub source_url: Option<String>,
    pub external_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_secs: Option<i32>,
    pub position: i32,
    pub status: String,
    pub mux_upload_id: Option<String>,
    pub mux_asset_id: Option<String>,
    pub mux_playback_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoEntity {
    pub fn embed_type(&self) -> EmbedType {
        // Column is CHECK-constrained to known embed types.
        self.embed_type.parse().unwrap_or(EmbedType::Direct)
    }

    pub fn status(&self) -> VideoStatus {
        self.status.parse().unwrap_or(VideoStatus::Pending)
    }

    /// Player URL, once the video is ready and the provider id is known.
    pub fn embed_url(&self) -> Option<String> {
        if !self.status().is_playable() {
            return None;
        }
        let embed_type = self.embed_type();
        match embed_type {
            EmbedType::Direct => self.source_url.clone(),
            EmbedType::Mux => self
                .mux_playback_id
                .as_deref()
                .map(|id| EmbedSource::mux(id).embed_url()),
            _ => self.external_id.as_ref().map(|id| {
                EmbedSource {
                    embed_type,
                    external_id: Some(id.clone()),
                    source_url: self.source_url.clone().unwrap_or_default(),
                }
                .embed_url()
            }),
        }
    }
}

impl From<VideoEntity> for domain::models::Video {
    fn from(entity: VideoEntity) -> Self {
        let embed_type = entity.embed_type();
        let status = entity.status();
        let embed_url = entity.embed_url();
        Self {
            id: entity.id,
            channel_id: entity.channel_id,
            title: entity.title,
            description: entity.description,
            embed_type,
            source_url: entity.source_url,
            external_id: entity.external_id,
            embed_url,
            thumbnail_url: entity.thumbnail_url,
            duration_secs: entity.duration_secs,
            position: entity.position,
            status,
            mux_playback_id: entity.mux_playback_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(embed_type: &str) -> VideoEntity {
        VideoEntity {
            id: Uuid::new_v4(),
            channel_id: Uuid::new_v4(),
            title: "Clip".to_string(),
            description: None,
            embed_type: embed_type.to_string(),
            source_url: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
            external_id: Some("dQw4w9WgXcQ".to_string()),
            thumbnail_url: None,
            duration_secs: None,
            position: 0,
            status: "ready".to_string(),
            mux_upload_id: None,
            mux_asset_id: None,
            mux_playback_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_youtube_embed_url() {
        let video: domain::models::Video = entity("youtube").into();
        assert_eq!(video.embed_type, EmbedType::Youtube);
        assert_eq!(
            video.embed_url.as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_mux_upload_has_no_url_until_ready() {
        let mut e = entity("mux");
        e.source_url = None;
        e.external_id = None;
        e.status = "processing".to_string();
        assert_eq!(e.embed_url(), None);

        e.mux_playback_id = Some("pb123".to_string());
        assert_eq!(e.status(), VideoStatus::Processing);
        assert_eq!(e.embed_url(), None);

        e.status = "ready".to_string();
        assert_eq!(
            e.embed_url().as_deref(),
            Some("https://stream.mux.com/pb123.m3u8")
        );
    }

    #[test]
    fn test_errored_video_has_no_url() {
        let mut e = entity("youtube");
        e.status = "errored".to_string();
        let video: domain::models::Video = e.into();
        assert_eq!(video.embed_url, None);
        assert_eq!(video.status, VideoStatus::Errored);
    }
}
