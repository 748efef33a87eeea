use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{AvailabilityQuery, BookingListQuery, CreateBookingRequest, UpdateStatusRequest};
use crate::api::dtos::responses::AvailabilityResponse;
use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams};
use crate::domain::models::status::StatusFlow;
use crate::domain::services::availability::{estimate_availability, DateRange, SuggestionPolicy};
use crate::domain::services::settings_cache::BOOKINGS_ENABLED;
use crate::error::AppError;
use std::collections::BTreeSet;
use std::sync::Arc;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde_json::json;
use tracing::{debug, info};

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = state.today();
    let policy = SuggestionPolicy::default();
    let range = DateRange::from_query(today, query.start.as_deref(), query.end.as_deref());

    let (scan_start, scan_end) = policy.window(today);
    let load = range.union(scan_start, scan_end);

    let booked: BTreeSet<NaiveDate> = state.booking_repo.list_active_between(load.start, load.end).await?
        .into_iter()
        .filter(|b| b.status.blocks_date())
        .map(|b| b.date)
        .collect();

    let estimate = estimate_availability(today, range, &booked, &policy);
    debug!(
        "Availability {}..{}: {} booked, {} suggested",
        range.start, range.end, estimate.booked_dates.len(), estimate.suggested_dates.len()
    );

    Ok(Json(AvailabilityResponse { success: true, estimate }))
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (expected YYYY-MM-DD)", field)))
}

fn parse_time(raw: &str, field: &str) -> Result<NaiveTime, AppError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid {} (expected HH:MM)", field)))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state.settings.get_bool(BOOKINGS_ENABLED, true).await {
        return Err(AppError::Forbidden("Bookings are currently disabled".into()));
    }

    let date = parse_date(&payload.date, "date")?;
    let start_time = parse_time(&payload.start_time, "start_time")?;
    let end_time = parse_time(&payload.end_time, "end_time")?;

    let name = payload.name.trim();
    let email = payload.email.trim();

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if end_time <= start_time {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }

    let policy = SuggestionPolicy::default();
    if date <= state.today() {
        return Err(AppError::Validation("Bookings must be for a future date".into()));
    }
    if date.weekday() == policy.excluded_weekday {
        return Err(AppError::Validation("The studio is closed on that day".into()));
    }

    let taken = state.booking_repo.list_active_between(date, date).await?;
    if !taken.is_empty() {
        return Err(AppError::Conflict("Date is already booked".into()));
    }

    let booking = Booking::new(NewBookingParams {
        date,
        start_time,
        end_time,
        name: name.to_string(),
        email: email.to_string(),
        notes: payload.notes.filter(|n| !n.trim().is_empty()),
    }, state.clock.now());

    let created = state.booking_repo.create(&booking).await?;
    info!("Booking {} requested for {}", created.id, created.date);

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "booking": created }))))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<BookingListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let from = query.from.as_deref().map(|s| parse_date(s, "from")).transpose()?;
    let to = query.to.as_deref().map(|s| parse_date(s, "to")).transpose()?;

    let bookings = state.booking_repo.list(from, to).await?;
    Ok(Json(json!({ "success": true, "bookings": bookings })))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(json!({ "success": true, "booking": booking })))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let next: BookingStatus = payload.status.parse()?;

    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let next = booking.status.transition_to(next)?;
    let updated = state.booking_repo.update_status(&booking_id, next, state.clock.now()).await?;
    info!("Booking {} moved {} -> {}", booking_id, booking.status, updated.status);

    Ok(Json(json!({ "success": true, "booking": updated })))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_repo.delete(&booking_id).await?;
    info!("Deleted booking {}", booking_id);
    Ok(Json(json!({ "success": true })))
}
