mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{parse_body, TestApp};
use serde_json::{json, Value};

async fn create_code(app: &TestApp, payload: Value) -> Value {
    let res = app.admin_post("/api/admin/promo-codes", payload).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["promo_code"].clone()
}

#[tokio::test]
async fn test_codes_are_stored_upper_case_and_unique() {
    let app = TestApp::new().await;

    let promo = create_code(&app, json!({ "code": " summer10 ", "discount_percent": 10 })).await;
    assert_eq!(promo["code"], "SUMMER10");
    assert_eq!(promo["is_active"], true);
    assert_eq!(promo["usage_count"], 0);

    let res = app.admin_post("/api/admin/promo-codes", json!({ "code": "SUMMER10", "discount_percent": 15 })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.admin_post("/api/admin/promo-codes", json!({ "code": "BIG", "discount_percent": 150 })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.admin_post("/api/admin/promo-codes", json!({
        "code": "BACKWARDS",
        "discount_percent": 5,
        "valid_from": "2026-11-01T00:00:00Z",
        "valid_until": "2026-10-01T00:00:00Z"
    })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_reports_pricing() {
    let app = TestApp::new().await;
    create_code(&app, json!({ "code": "SUMMER10", "discount_percent": 10 })).await;

    let res = app.post("/api/promo-codes/validate", json!({ "code": "summer10", "amount_cents": 12345 })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["valid"], true);
    assert_eq!(body["discount_percent"], 10);
    assert_eq!(body["pricing"]["discount_cents"], 1235);
    assert_eq!(body["pricing"]["total_cents"], 11110);
    assert!(body.get("reason").is_none());
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let app = TestApp::new().await;

    let res = app.post("/api/promo-codes/validate", json!({ "code": "NOPE" })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.post("/api/promo-codes/redeem", json!({ "code": "NOPE" })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_window_reasons() {
    let app = TestApp::new().await;
    create_code(&app, json!({ "code": "OLD", "discount_percent": 10, "valid_until": "2026-10-01T00:00:00Z" })).await;
    create_code(&app, json!({ "code": "SOON", "discount_percent": 10, "valid_from": "2026-10-25T00:00:00Z" })).await;
    create_code(&app, json!({ "code": "OFF", "discount_percent": 10, "is_active": false })).await;

    for (code, reason) in [("OLD", "expired"), ("SOON", "not_yet_valid"), ("OFF", "inactive")] {
        let body = parse_body(app.post("/api/promo-codes/validate", json!({ "code": code, "amount_cents": 1000 })).await).await;
        assert_eq!(body["valid"], false, "{}", code);
        assert_eq!(body["reason"], reason, "{}", code);
        assert!(body.get("pricing").is_none(), "{}", code);
    }

    app.clock.advance(Duration::days(7));
    let body = parse_body(app.post("/api/promo-codes/validate", json!({ "code": "SOON" })).await).await;
    assert_eq!(body["valid"], true);
}

#[tokio::test]
async fn test_redeem_respects_usage_limit() {
    let app = TestApp::new().await;
    create_code(&app, json!({ "code": "ONCE", "discount_percent": 50, "max_usage": 1 })).await;

    let res = app.post("/api/promo-codes/redeem", json!({ "code": "once" })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["promo_code"]["usage_count"], 1);

    let res = app.post("/api/promo-codes/redeem", json!({ "code": "ONCE" })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body = parse_body(app.post("/api/promo-codes/validate", json!({ "code": "ONCE" })).await).await;
    assert_eq!(body["reason"], "exhausted");
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = TestApp::new().await;
    let promo = create_code(&app, json!({ "code": "WINTER", "discount_percent": 20, "max_usage": 1 })).await;
    let id = promo["id"].as_str().unwrap();

    app.post("/api/promo-codes/redeem", json!({ "code": "WINTER" })).await;

    let res = app.admin_put(&format!("/api/admin/promo-codes/{}", id), json!({
        "discount_percent": 25,
        "reset_usage": true
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = parse_body(res).await["promo_code"].clone();
    assert_eq!(updated["discount_percent"], 25);
    assert_eq!(updated["usage_count"], 0);

    let res = app.admin_put(&format!("/api/admin/promo-codes/{}", id), json!({ "is_active": false })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(app.post("/api/promo-codes/validate", json!({ "code": "WINTER" })).await).await;
    assert_eq!(body["reason"], "inactive");

    let list = parse_body(app.admin_get("/api/admin/promo-codes").await).await;
    assert_eq!(list["promo_codes"].as_array().unwrap().len(), 1);

    let res = app.admin_delete(&format!("/api/admin/promo-codes/{}", id)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post("/api/promo-codes/validate", json!({ "code": "WINTER" })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app.admin_put("/api/admin/promo-codes/missing", json!({ "is_active": true })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_rejects_oversized_amounts() {
    let app = TestApp::new().await;
    create_code(&app, json!({ "code": "BIG", "discount_percent": 50 })).await;

    let res = app.post("/api/promo-codes/validate", json!({ "code": "BIG", "amount_cents": i64::MAX })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.post("/api/promo-codes/validate", json!({ "code": "BIG", "amount_cents": -1 })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = parse_body(app.post("/api/promo-codes/validate", json!({ "code": "BIG", "amount_cents": 100_000_000_000i64 })).await).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["pricing"]["total_cents"], 50_000_000_000i64);
}
