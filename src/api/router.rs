use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, booking, settings, promo_code, gift_card, challenge};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Public Booking Flow
        .route("/api/bookings/availability", get(booking::get_availability))
        .route("/api/bookings", post(booking::create_booking))

        // Public Settings
        .route("/api/settings/public", get(settings::get_public_settings).post(settings::upsert_public_settings))

        // Discounts
        .route("/api/promo-codes/validate", post(promo_code::validate_promo_code))
        .route("/api/promo-codes/redeem", post(promo_code::redeem_promo_code))
        .route("/api/gift-cards/{code}", get(gift_card::check_gift_card))
        .route("/api/gift-cards/{code}/redeem", post(gift_card::redeem_gift_card))
        .route("/api/challenge/quote", get(challenge::quote))

        // Admin Bookings
        .route("/api/admin/bookings", get(booking::list_bookings))
        .route("/api/admin/bookings/{booking_id}", get(booking::get_booking).delete(booking::delete_booking))
        .route("/api/admin/bookings/{booking_id}/status", put(booking::update_booking_status))

        // Admin Settings
        .route("/api/admin/settings", get(settings::list_settings))
        .route("/api/admin/settings/{key}", put(settings::upsert_setting).delete(settings::delete_setting))

        // Admin Discounts
        .route("/api/admin/promo-codes", get(promo_code::list_promo_codes).post(promo_code::create_promo_code))
        .route("/api/admin/promo-codes/{promo_id}", put(promo_code::update_promo_code).delete(promo_code::delete_promo_code))
        .route("/api/admin/challenge", get(challenge::get_challenge).put(challenge::update_challenge))

        // Admin Gift Cards
        .route("/api/admin/gift-card-orders", get(gift_card::list_orders).post(gift_card::create_order))
        .route("/api/admin/gift-card-orders/{order_id}", get(gift_card::get_order))
        .route("/api/admin/gift-card-orders/{order_id}/status", put(gift_card::update_order_status))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        admin = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
