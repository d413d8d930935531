//! Integration tests for bearer-token handling.
//!
//! Every request here is refused by the auth extractor before a query
//! runs, so no database is needed.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    get_request, get_request_with_auth, json_request, json_request_with_auth, offline_app,
    parse_response_body, sign_token, test_config,
};
use serde_json::json;
use shared::jwt::Claims;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_create_channel_without_token_returns_401() {
    let app = offline_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/channels",
            json!({ "name": "Lo-fi mornings" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "unauthorized");
    assert!(body["message"].as_str().unwrap().contains("Authorization"));
}

#[tokio::test]
async fn test_create_channel_with_garbage_token_returns_401() {
    let app = offline_app();

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/channels",
            json!({ "name": "Lo-fi mornings" }),
            "not-a-jwt",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_returns_401() {
    let config = test_config();
    let claims = Claims::for_user(Uuid::new_v4(), None, -3600);
    let token = sign_token(&config, &claims);

    let response = offline_app()
        .oneshot(get_request_with_auth("/api/me", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn test_token_for_other_audience_returns_401() {
    let config = test_config();
    let mut claims = Claims::for_user(Uuid::new_v4(), None, 3600);
    claims.aud = "anon".to_string();
    let token = sign_token(&config, &claims);

    let response = offline_app()
        .oneshot(get_request_with_auth("/api/me", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_returns_401() {
    let other = common::test_config_with(&[("auth.jwt_secret", "some-other-secret-entirely")]);
    let token = sign_token(&other, &Claims::for_user(Uuid::new_v4(), None, 3600));

    let response = offline_app()
        .oneshot(get_request_with_auth("/api/me", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_returns_401() {
    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/api/me")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let channel_id = Uuid::new_v4();
    let cases = [
        (Method::GET, "/api/me".to_string()),
        (Method::GET, "/api/me/following".to_string()),
        (Method::GET, "/api/me/channels".to_string()),
        (Method::GET, "/api/me/history".to_string()),
        (Method::GET, "/api/me/earnings".to_string()),
        (Method::GET, format!("/api/channels/{}/follow", channel_id)),
        (Method::POST, format!("/api/channels/{}/follow", channel_id)),
        (Method::DELETE, format!("/api/channels/{}/follow", channel_id)),
        (Method::DELETE, format!("/api/channels/{}", channel_id)),
    ];

    for (method, uri) in cases {
        let request = axum::http::Request::builder()
            .method(method.clone())
            .uri(&uri)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = offline_app().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should need a token",
            method,
            uri
        );
    }
}

#[tokio::test]
async fn test_checkout_requires_token() {
    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/checkout",
            json!({ "plan": "premium" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_catalogue_needs_no_token() {
    let response = offline_app()
        .oneshot(get_request("/api/plans"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
