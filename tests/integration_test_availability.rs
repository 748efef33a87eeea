mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::{json, Value};

async fn book(app: &TestApp, date: &str) -> Value {
    let res = app.post("/api/bookings", json!({
        "date": date,
        "start_time": "10:00",
        "end_time": "12:00",
        "name": "Ada Lovelace",
        "email": "ada@example.com"
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED, "booking {} should be accepted", date);
    parse_body(res).await
}

fn dates(v: &Value) -> Vec<String> {
    v.as_array().unwrap().iter().map(|d| d.as_str().unwrap().to_string()).collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let res = app.get("/health").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_empty_calendar_suggests_next_five_open_days() {
    let app = TestApp::new().await;

    let res = app.get("/api/bookings/availability").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["success"], true);
    assert!(body["bookedDates"].as_array().unwrap().is_empty());
    assert_eq!(
        dates(&body["suggestedDates"]),
        vec!["2026-10-20", "2026-10-21", "2026-10-22", "2026-10-23", "2026-10-24"]
    );
}

#[tokio::test]
async fn test_booked_days_and_mondays_are_skipped() {
    let app = TestApp::new().await;
    book(&app, "2026-10-20").await;
    book(&app, "2026-10-22").await;

    let body = parse_body(app.get("/api/bookings/availability").await).await;

    assert_eq!(dates(&body["bookedDates"]), vec!["2026-10-20", "2026-10-22"]);
    // 2026-10-26 is a Monday
    assert_eq!(
        dates(&body["suggestedDates"]),
        vec!["2026-10-21", "2026-10-23", "2026-10-24", "2026-10-25", "2026-10-27"]
    );
}

#[tokio::test]
async fn test_cancelled_booking_frees_its_date() {
    let app = TestApp::new().await;
    let created = book(&app, "2026-10-20").await;
    let id = created["booking"]["id"].as_str().unwrap();

    let res = app.admin_put(&format!("/api/admin/bookings/{}/status", id), json!({ "status": "cancelled" })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = parse_body(app.get("/api/bookings/availability").await).await;
    assert!(body["bookedDates"].as_array().unwrap().is_empty());
    assert_eq!(dates(&body["suggestedDates"])[0], "2026-10-20");
}

#[tokio::test]
async fn test_query_range_limits_booked_dates_only() {
    let app = TestApp::new().await;
    book(&app, "2026-10-20").await;
    book(&app, "2026-10-28").await;

    let body = parse_body(app.get("/api/bookings/availability?start=2026-10-25&end=2026-10-30").await).await;

    assert_eq!(dates(&body["bookedDates"]), vec!["2026-10-28"]);
    assert_eq!(
        dates(&body["suggestedDates"]),
        vec!["2026-10-21", "2026-10-22", "2026-10-23", "2026-10-24", "2026-10-25"]
    );
}

#[tokio::test]
async fn test_bad_query_falls_back_to_defaults() {
    let app = TestApp::new().await;
    book(&app, "2026-11-10").await;

    let baseline = parse_body(app.get("/api/bookings/availability").await).await;

    for uri in [
        "/api/bookings/availability?start=garbage&end=2026-13-45",
        "/api/bookings/availability?start=2026-12-01&end=2026-11-01",
    ] {
        let res = app.get(uri).await;
        assert_eq!(res.status(), StatusCode::OK, "{}", uri);
        assert_eq!(parse_body(res).await, baseline, "{}", uri);
    }
    assert_eq!(dates(&baseline["bookedDates"]), vec!["2026-11-10"]);
}

#[tokio::test]
async fn test_today_follows_the_clock() {
    let app = TestApp::new().await;
    app.clock.advance(chrono::Duration::days(1));

    let body = parse_body(app.get("/api/bookings/availability").await).await;
    assert_eq!(dates(&body["suggestedDates"])[0], "2026-10-21");
}
