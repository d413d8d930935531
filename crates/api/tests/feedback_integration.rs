//! Integration tests for the feedback route.
//!
//! Rejected submissions never reach the database, which lets the
//! sanitization and rate limit paths run offline.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{
    cleanup_all_test_data, create_test_app, create_test_pool, json_request, lazy_pool,
    offline_app, parse_response_body, test_config, test_config_with, TestUser,
};
use serde_json::json;
use tower::ServiceExt;

fn feedback_from(ip: &str, message: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/feedback")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Forwarded-For", format!("{}, 10.0.0.1", ip))
        .body(Body::from(json!({ "message": message }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_short_feedback_returns_400() {
    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/feedback",
            json!({ "message": "too short" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_markup_only_feedback_returns_400() {
    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/feedback",
            json!({ "message": "<script>alert('x')</script><b></b><i></i>" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlong_feedback_returns_400() {
    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/feedback",
            json!({ "message": "a".repeat(2001) }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/feedback",
            json!({ "message": "The player stutters on Safari", "category": "rant" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("rant"));
}

#[tokio::test]
async fn test_rate_limit_returns_429_with_retry_after() {
    let config = test_config_with(&[("security.feedback_rate_limit_per_hour", "3")]);
    let app = create_test_app(config, lazy_pool());

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(feedback_from("203.0.113.7", "short"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .clone()
        .oneshot(feedback_from("203.0.113.7", "short"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "rate_limited");

    // Another client still has its own budget.
    let response = app
        .clone()
        .oneshot(feedback_from("198.51.100.20", "short"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rate_limit_disabled_with_zero() {
    let config = test_config_with(&[("security.feedback_rate_limit_per_hour", "0")]);
    let app = create_test_app(config, lazy_pool());

    for _ in 0..10 {
        let response = app
            .clone()
            .oneshot(feedback_from("203.0.113.8", "short"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_feedback_is_stored_sanitized_with_hashed_client() {
    let pool = create_test_pool().await;
    cleanup_all_test_data(&pool).await;
    let config = test_config();
    let app = create_test_app(config.clone(), pool.clone());
    let user = TestUser::new(&config);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/feedback")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", user.token))
        .header("X-Real-IP", "192.0.2.44")
        .body(Body::from(
            json!({
                "message": "Love the <b>loop</b> feature, <script>x()</script>please keep it",
                "category": "praise"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["received"], true);

    let (message, client_hash, user_id): (String, Option<String>, Option<uuid::Uuid>) =
        sqlx::query_as("SELECT message, client_hash, user_id FROM feedback")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(!message.contains('<'));
    assert!(message.contains("loop"));
    assert_eq!(client_hash.as_deref(), Some(shared::crypto::sha256_hex("192.0.2.44").as_str()));
    assert_eq!(user_id, Some(user.id));

    cleanup_all_test_data(&pool).await;
}
