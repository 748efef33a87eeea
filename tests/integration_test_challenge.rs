mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use common::{fixed_now, parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_no_challenge_means_no_discount() {
    let app = TestApp::new().await;

    let res = app.get("/api/challenge/quote?amount_cents=10000").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["active"], false);
    assert_eq!(body["discount_percent"], 0);
    assert_eq!(body["pricing"]["total_cents"], 10000);

    let admin = parse_body(app.admin_get("/api/admin/challenge").await).await;
    assert_eq!(admin["challenge"]["is_active"], false);
    let stamped: DateTime<Utc> = serde_json::from_value(admin["challenge"]["updated_at"].clone()).unwrap();
    assert_eq!(stamped, fixed_now());
}

#[tokio::test]
async fn test_active_challenge_discounts_quote() {
    let app = TestApp::new().await;

    let res = app.admin_put("/api/admin/challenge", json!({ "discount_percent": 20, "is_active": true })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(app.get("/api/challenge/quote?amount_cents=10000").await).await;
    assert_eq!(body["active"], true);
    assert_eq!(body["discount_percent"], 20);
    assert_eq!(body["pricing"]["discount_cents"], 2000);
    assert_eq!(body["pricing"]["total_cents"], 8000);
}

#[tokio::test]
async fn test_feature_flag_switches_challenge_off() {
    let app = TestApp::new().await;
    app.admin_put("/api/admin/challenge", json!({ "discount_percent": 20, "is_active": true })).await;

    app.admin_put("/api/admin/settings/challenge_enabled", json!({ "value": false })).await;

    let body = parse_body(app.get("/api/challenge/quote?amount_cents=10000").await).await;
    assert_eq!(body["active"], false);
    assert_eq!(body["pricing"]["total_cents"], 10000);
}

#[tokio::test]
async fn test_challenge_window_expires() {
    let app = TestApp::new().await;
    app.admin_put("/api/admin/challenge", json!({
        "discount_percent": 15,
        "is_active": true,
        "valid_until": "2026-10-31T23:59:59Z"
    })).await;

    let body = parse_body(app.get("/api/challenge/quote?amount_cents=1000").await).await;
    assert_eq!(body["active"], true);

    app.clock.advance(Duration::days(30));
    let body = parse_body(app.get("/api/challenge/quote?amount_cents=1000").await).await;
    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn test_challenge_validation() {
    let app = TestApp::new().await;

    let res = app.admin_put("/api/admin/challenge", json!({ "discount_percent": 101, "is_active": true })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get("/api/challenge/quote?amount_cents=-5").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.send("PUT", "/api/admin/challenge", Some(json!({ "discount_percent": 10 })), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_quote_rejects_oversized_amounts() {
    let app = TestApp::new().await;
    app.admin_put("/api/admin/challenge", json!({ "discount_percent": 20, "is_active": true })).await;

    let res = app.get("/api/challenge/quote?amount_cents=9223372036854775807").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.get("/api/challenge/quote?amount_cents=100000000000").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["pricing"]["discount_cents"], 20_000_000_000i64);
    assert_eq!(body["pricing"]["total_cents"], 80_000_000_000i64);
}
