//! Integration tests for the stateless routes: AI channels, SoulShield,
//! plans, probes and the response headers every route carries.

mod common;

use axum::http::{Method, StatusCode};
use common::{get_request, json_request, offline_app, parse_response_body};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_ai_channels_returns_all_eight_sorted() {
    let response = offline_app()
        .oneshot(get_request("/api/ai-channels?q=gym%20workout&hour=7"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 8);
    assert_eq!(data[0]["slug"], "workout-pump");

    let scores: Vec<u64> = data.iter().map(|c| c["score"].as_u64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_ai_channels_keyword_beats_time_bonus() {
    let response = offline_app()
        .oneshot(get_request("/api/ai-channels?q=comedy&hour=7"))
        .await
        .unwrap();

    let body = parse_response_body(response).await;
    assert_eq!(body["data"][0]["slug"], "laugh-track");
}

#[tokio::test]
async fn test_ai_channels_rejects_hour_out_of_range() {
    let response = offline_app()
        .oneshot(get_request("/api/ai-channels?hour=24"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ai_channel_lookup() {
    let response = offline_app()
        .oneshot(get_request("/api/ai-channels/nature-escape"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["name"], "Nature Escape");

    let response = offline_app()
        .oneshot(get_request("/api/ai-channels/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_soulshield_presets_catalogue() {
    let response = offline_app()
        .oneshot(get_request("/api/soulshield/presets"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["categories"].as_array().unwrap().len(), 8);
    assert_eq!(body["presets"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_soulshield_check_blocks_tagged_content() {
    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/soulshield/check",
            json!({ "tags": ["horror", "cooking"], "preset": "gentle" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["allowed"], false);
    assert_eq!(body["blocked_tags"], json!(["horror"]));
}

#[tokio::test]
async fn test_soulshield_check_custom_categories_add_to_preset() {
    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/soulshield/check",
            json!({ "tags": ["politics"], "preset": "off", "custom": ["politics"] }),
        ))
        .await
        .unwrap();

    let body = parse_response_body(response).await;
    assert_eq!(body["allowed"], false);

    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/soulshield/check",
            json!({ "tags": ["politics"], "preset": "off" }),
        ))
        .await
        .unwrap();

    let body = parse_response_body(response).await;
    assert_eq!(body["allowed"], true);
}

#[tokio::test]
async fn test_soulshield_check_unknown_preset_is_json_400() {
    let response = offline_app()
        .oneshot(json_request(
            Method::POST,
            "/api/soulshield/check",
            json!({ "tags": ["horror"], "preset": "paranoid" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_soulshield_check_without_content_type_is_json_400() {
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/soulshield/check")
        .body(axum::body::Body::from(r#"{"tags":[],"preset":"off"}"#))
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_plans_catalogue() {
    let response = offline_app()
        .oneshot(get_request("/api/plans"))
        .await
        .unwrap();

    let body = parse_response_body(response).await;
    let ids: Vec<&str> = body["plans"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["free", "premium", "creator"]);
}

#[tokio::test]
async fn test_liveness_probe() {
    let response = offline_app()
        .oneshot(get_request("/api/health/live"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let response = offline_app()
        .oneshot(get_request("/api/plans"))
        .await
        .unwrap();

    let headers = response.headers();
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_incoming_request_id_is_echoed() {
    let request = axum::http::Request::builder()
        .uri("/api/health/live")
        .header("X-Request-ID", "req-from-edge-123")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = offline_app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-from-edge-123");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let response = offline_app()
        .oneshot(get_request("/api/nope"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
