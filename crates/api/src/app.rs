use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::{PaymentGateway, VideoPipeline};
use shared::jwt::JwtVerifier;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    feedback_rate_limit, metrics_handler, metrics_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{
    ai_channels, billing, channels, feedback, follows, health, history, me, soulshield, uploads,
    videos, webhooks,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtVerifier>,
    /// `None` when `security.feedback_rate_limit_per_hour` is 0.
    pub feedback_limiter: Option<Arc<RateLimiterState>>,
    pub payments: Arc<dyn PaymentGateway>,
    pub video_pipeline: Arc<dyn VideoPipeline>,
}

/// Builds the router around the given external services.
pub fn create_app_with_services(
    config: Config,
    pool: PgPool,
    payments: Arc<dyn PaymentGateway>,
    video_pipeline: Arc<dyn VideoPipeline>,
) -> Router {
    create_app_with_state(config, pool, payments, video_pipeline).0
}

/// Like [`create_app_with_services`], also handing back the shared state
/// so the caller can run background upkeep on it.
pub fn create_app_with_state(
    config: Config,
    pool: PgPool,
    payments: Arc<dyn PaymentGateway>,
    video_pipeline: Arc<dyn VideoPipeline>,
) -> (Router, AppState) {
    let config = Arc::new(config);

    let jwt = Arc::new(JwtVerifier::new(
        &config.auth.jwt_secret,
        &config.auth.audience,
        config.auth.leeway_secs,
    ));

    let feedback_limiter = if config.security.feedback_rate_limit_per_hour > 0 {
        Some(Arc::new(RateLimiterState::per_hour(
            config.security.feedback_rate_limit_per_hour,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        feedback_limiter,
        payments,
        video_pipeline,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authentication is enforced per handler through the UserAuth /
    // OptionalUserAuth extractors.
    let channel_routes = Router::new()
        .route(
            "/api/channels",
            get(channels::list_channels).post(channels::create_channel),
        )
        .route(
            "/api/channels/:channel_id",
            get(channels::get_channel)
                .patch(channels::update_channel)
                .delete(channels::delete_channel),
        )
        .route(
            "/api/channels/:channel_id/follow",
            get(follows::follow_status)
                .post(follows::follow_channel)
                .delete(follows::unfollow_channel),
        )
        .route(
            "/api/channels/:channel_id/videos",
            get(videos::list_videos).post(videos::add_video),
        )
        .route(
            "/api/channels/:channel_id/videos/order",
            put(videos::reorder_videos),
        )
        .route(
            "/api/channels/:channel_id/videos/:video_id",
            axum::routing::delete(videos::delete_video),
        )
        .route("/api/uploads", post(uploads::create_upload));

    let me_routes = Router::new()
        .route("/api/me", get(me::get_profile).patch(me::update_profile))
        .route("/api/me/soulshield", put(me::update_soulshield))
        .route("/api/me/following", get(me::list_following))
        .route("/api/me/channels", get(me::list_my_channels))
        .route("/api/me/history", get(history::list_history))
        .route("/api/me/earnings", get(me::get_earnings))
        .route("/api/history", post(history::record_watch));

    let billing_routes = Router::new()
        .route("/api/plans", get(billing::list_plans))
        .route("/api/checkout", post(billing::create_checkout));

    let feedback_routes = Router::new()
        .route("/api/feedback", post(feedback::submit_feedback))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            feedback_rate_limit,
        ));

    // Webhooks authenticate with provider signatures over the raw body.
    let webhook_routes = Router::new()
        .route("/api/webhooks/stripe", post(webhooks::stripe_webhook))
        .route("/api/webhooks/mux", post(webhooks::mux_webhook));

    let catalogue_routes = Router::new()
        .route("/api/ai-channels", get(ai_channels::suggest_channels))
        .route("/api/ai-channels/:slug", get(ai_channels::get_ai_channel))
        .route("/api/soulshield/presets", get(soulshield::list_presets))
        .route("/api/soulshield/check", post(soulshield::check_content));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let router = Router::new()
        .merge(public_routes)
        .merge(channel_routes)
        .merge(me_routes)
        .merge(billing_routes)
        .merge(feedback_routes)
        .merge(webhook_routes)
        .merge(catalogue_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state.clone());

    (router, state)
}
