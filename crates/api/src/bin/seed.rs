//! Demo data seeder.
//!
//! Creates a demo creator and viewer, a few published channels with
//! embedded videos, follows, watch history, and an earnings line, then
//! prints bearer tokens for both users. Re-running skips channels whose
//! slug already exists.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use domain::models::video::detect_embed;
use loopeasy_api::{config, middleware};
use persistence::repositories::{
    ChannelRepository, EarningsRepository, FollowRepository, NewChannel, NewEmbeddedVideo,
    ProfileRepository, VideoRepository, WatchHistoryRepository,
};
use shared::jwt::{Claims, JwtVerifier};
use tracing::{info, warn};
use uuid::Uuid;

const CREATOR_ID: Uuid = Uuid::from_u128(0x0e5a_1e00_0000_4000_8000_0000_0000_0001);
const VIEWER_ID: Uuid = Uuid::from_u128(0x0e5a_1e00_0000_4000_8000_0000_0000_0002);

/// Tokens minted here stay valid for a week.
const TOKEN_TTL_SECS: i64 = 7 * 24 * 3600;

struct DemoChannel {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    is_premium: bool,
    videos: &'static [(&'static str, &'static str)],
}

const DEMO_CHANNELS: [DemoChannel; 3] = [
    DemoChannel {
        name: "Morning Flow",
        slug: "morning-flow",
        description: "Gentle yoga and stretching to start the day.",
        category: "wellness",
        tags: &[],
        is_premium: false,
        videos: &[
            ("Sunrise stretch", "https://www.youtube.com/watch?v=v7AYKMP6rOE"),
            ("Ten minute mobility", "https://vimeo.com/76979871"),
        ],
    },
    DemoChannel {
        name: "Late Night Lo-fi",
        slug: "late-night-lofi",
        description: "Beats to unwind and focus to.",
        category: "music",
        tags: &[],
        is_premium: false,
        videos: &[
            ("Rainy window", "https://www.youtube.com/watch?v=jfKfPfyJRdk"),
            ("Tape hiss", "https://www.dailymotion.com/video/x7tgad0"),
        ],
    },
    DemoChannel {
        name: "Midnight Frights",
        slug: "midnight-frights",
        description: "Short horror films, curated weekly.",
        category: "film",
        tags: &["horror", "violence"],
        is_premium: true,
        videos: &[(
            "The Lighthouse Keeper",
            "https://cdn.example.com/films/lighthouse.mp4",
        )],
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load().context("Failed to load configuration")?;
    middleware::logging::init_logging(&config.logging)
        .context("Failed to initialize logging")?;

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;
    persistence::db::run_migrations(&pool).await?;

    let profiles = ProfileRepository::new(pool.clone());
    let channels = ChannelRepository::new(pool.clone());
    let videos = VideoRepository::new(pool.clone());
    let follows = FollowRepository::new(pool.clone());
    let history = WatchHistoryRepository::new(pool.clone());
    let earnings = EarningsRepository::new(pool.clone());

    profiles
        .ensure_exists(CREATOR_ID, Some("creator@loopeasy.test"))
        .await?;
    profiles
        .update(
            CREATOR_ID,
            Some("demo_creator"),
            Some("Demo Creator"),
            None,
            Some("Curating calm corners of the internet."),
        )
        .await?;
    profiles.mark_creator(CREATOR_ID).await?;

    profiles
        .ensure_exists(VIEWER_ID, Some("viewer@loopeasy.test"))
        .await?;
    profiles
        .update(VIEWER_ID, Some("demo_viewer"), Some("Demo Viewer"), None, None)
        .await?;

    let mut seeded = 0usize;
    for demo in DEMO_CHANNELS.iter() {
        if channels.find_by_slug(demo.slug).await?.is_some() {
            info!(slug = demo.slug, "Channel already seeded, skipping");
            continue;
        }

        let tags: Vec<String> = demo.tags.iter().map(|t| t.to_string()).collect();
        let channel = channels
            .create(NewChannel {
                owner_id: CREATOR_ID,
                name: demo.name,
                slug: demo.slug,
                description: Some(demo.description),
                thumbnail_url: None,
                category: Some(demo.category),
                content_tags: &tags,
                is_premium: demo.is_premium,
                is_published: true,
            })
            .await?;

        let mut first_video = None;
        let start = videos.next_position(channel.id).await?;
        info!(slug = demo.slug, start, "Appending demo videos");
        for (title, url) in demo.videos {
            let source = match detect_embed(url) {
                Ok(source) => source,
                Err(e) => {
                    warn!(url = *url, error = %e, "Skipping demo video");
                    continue;
                }
            };
            let thumbnail = source.default_thumbnail();
            let video = videos
                .create_embedded(NewEmbeddedVideo {
                    channel_id: channel.id,
                    title,
                    description: None,
                    embed_type: source.embed_type.as_str(),
                    source_url: &source.source_url,
                    external_id: source.external_id.as_deref(),
                    thumbnail_url: thumbnail.as_deref(),
                    duration_secs: None,
                })
                .await?;
            first_video.get_or_insert(video.id);
        }

        follows.follow(VIEWER_ID, channel.id).await?;
        if let Some(video_id) = first_video {
            history.record(VIEWER_ID, video_id, 42, false).await?;
        }

        seeded += 1;
        info!(channel_id = %channel.id, slug = demo.slug, "Seeded channel");
    }

    if seeded > 0 {
        let today = Utc::now().date_naive();
        let period_start =
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
        earnings
            .create(
                CREATOR_ID,
                period_start,
                today,
                1250,
                "subscription_share",
                "pending",
            )
            .await?;
    }
    info!(seeded, "Seeding finished");

    let verifier = JwtVerifier::new(
        &config.auth.jwt_secret,
        &config.auth.audience,
        config.auth.leeway_secs,
    );
    for (label, id, email) in [
        ("creator", CREATOR_ID, "creator@loopeasy.test"),
        ("viewer", VIEWER_ID, "viewer@loopeasy.test"),
    ] {
        let mut claims = Claims::for_user(id, Some(email), TOKEN_TTL_SECS);
        claims.aud = config.auth.audience.clone();
        let token = verifier.sign(&claims)?;
        println!("{label} ({id}): {token}");
    }

    Ok(())
}
