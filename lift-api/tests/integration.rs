//! Integration tests for lift-api.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use lift_api::{build_router, AppState};
use lift_common::CalculatorDefaults;
use tower::ServiceExt;

fn test_app() -> axum::Router {
    build_router(AppState::new(CalculatorDefaults::default()))
}

async fn post_json(uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_calculate_capped_reference() {
    let (status, json) = post_json(
        "/api/v1/calculate",
        r#"{
            "monthly_spend": 10000,
            "cost_per_conversion": 600,
            "conversion_rate": 1.0,
            "baseline_rate": 0.05,
            "mde": 0.2,
            "power": 0.8,
            "p_value": 0.05,
            "cap_enabled": true,
            "cap_multiplier": 5.0
        }"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["result"]["is_capped"], true);
    assert_eq!(json["data"]["result"]["recommended_budget"], 50000.0);
    assert_eq!(json["data"]["mde_category"], "large");
    assert!(json["data"]["explanation"]
        .as_str()
        .unwrap()
        .starts_with("Capped"));
}

#[tokio::test]
async fn test_calculate_uses_defaults_for_missing_fields() {
    let (status, json) =
        post_json("/api/v1/calculate", r#"{"monthly_spend": 30000, "channel": "linkedin"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["inputs"]["cost_per_conversion"], 300.0);
    assert_eq!(json["data"]["inputs"]["test_duration_weeks"], 8);
    assert_eq!(json["data"]["result"]["channel"], "linkedin");
}

#[tokio::test]
async fn test_calculate_rejects_out_of_range_power() {
    let (status, json) =
        post_json("/api/v1/calculate", r#"{"monthly_spend": 30000, "power": 1.2}"#).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"]["field"], "power");
}

#[tokio::test]
async fn test_calculate_zero_mde_is_degenerate() {
    let (status, json) =
        post_json("/api/v1/calculate", r#"{"monthly_spend": 30000, "mde": 0}"#).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "DEGENERATE_EFFECT");
}

#[tokio::test]
async fn test_calculate_requires_monthly_spend() {
    let (status, json) = post_json("/api/v1/calculate", r#"{"mde": 0.1}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_scenarios_returns_three_presets() {
    let (status, json) = post_json(
        "/api/v1/scenarios",
        r#"{"monthly_spend": 30000, "cap_enabled": false}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let outcomes = json["data"].as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["preset"], "high_confidence");
    assert_eq!(outcomes[2]["preset"], "low_confidence");
    assert_eq!(outcomes[1]["settings"]["power"], 0.8);
}

#[tokio::test]
async fn test_context_share() {
    let (status, json) = post_json(
        "/api/v1/context",
        r#"{
            "monthly_spend": 5000,
            "cost_per_conversion": 100,
            "total_marketing_spend": 100000,
            "total_monthly_conversions": 1000
        }"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["signal"], "low_share");
    assert_eq!(json["data"]["spend_share_pct"], 5.0);
}

#[tokio::test]
async fn test_context_conflict() {
    let (status, json) = post_json(
        "/api/v1/context",
        r#"{
            "monthly_spend": 50000,
            "total_marketing_spend": 10000,
            "total_monthly_conversions": 1000
        }"#,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}
