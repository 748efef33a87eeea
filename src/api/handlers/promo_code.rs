use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{CreatePromoCodeRequest, RedeemPromoCodeRequest, UpdatePromoCodeRequest, ValidatePromoCodeRequest};
use crate::api::dtos::responses::PromoValidationResponse;
use crate::domain::models::promo_code::{normalize_code, PromoCode};
use crate::domain::services::pricing::{apply_percent_discount, validate_amount};
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;
use tracing::info;

fn validate_percent(percent: i32) -> Result<i32, AppError> {
    if !(0..=100).contains(&percent) {
        return Err(AppError::Validation("discount_percent must be between 0 and 100".into()));
    }
    Ok(percent)
}

fn validate_code(code: &str) -> Result<String, AppError> {
    let code = normalize_code(code);
    if code.is_empty() {
        return Err(AppError::Validation("Code is required".into()));
    }
    Ok(code)
}

pub async fn validate_promo_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidatePromoCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let amount = payload.amount_cents
        .map(validate_amount)
        .transpose()
        .map_err(AppError::Validation)?;

    let code = validate_code(&payload.code)?;
    let promo = state.promo_code_repo.find_by_code(&code).await?
        .ok_or(AppError::NotFound("Promo code not found".into()))?;

    let response = match promo.window.check(state.clock.now()) {
        Ok(()) => PromoValidationResponse {
            success: true,
            valid: true,
            reason: None,
            message: None,
            discount_percent: Some(promo.discount_percent),
            pricing: amount.map(|amount| apply_percent_discount(amount, promo.discount_percent)),
        },
        Err(reason) => PromoValidationResponse {
            success: true,
            valid: false,
            reason: Some(reason),
            message: Some(reason.message()),
            discount_percent: None,
            pricing: None,
        },
    };

    Ok(Json(response))
}

pub async fn redeem_promo_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RedeemPromoCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let code = validate_code(&payload.code)?;
    let now = state.clock.now();

    match state.promo_code_repo.redeem(&code, now).await? {
        Some(promo) => {
            info!("Promo code {} redeemed ({} uses)", promo.code, promo.window.usage_count);
            Ok(Json(json!({ "success": true, "promo_code": promo })))
        }
        None => {
            let promo = state.promo_code_repo.find_by_code(&code).await?
                .ok_or(AppError::NotFound("Promo code not found".into()))?;
            let message = promo.window.check(now)
                .err()
                .map(|r| r.message())
                .unwrap_or("Code could not be redeemed");
            Err(AppError::Conflict(message.into()))
        }
    }
}

pub async fn list_promo_codes(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let codes = state.promo_code_repo.list().await?;
    Ok(Json(json!({ "success": true, "promo_codes": codes })))
}

pub async fn create_promo_code(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreatePromoCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let code = validate_code(&payload.code)?;
    let percent = validate_percent(payload.discount_percent)?;

    let window = payload.window.into_window(true, 0);
    window.validate_shape().map_err(AppError::Validation)?;

    let promo = PromoCode::new(&code, payload.description, percent, window, state.clock.now());
    let created = state.promo_code_repo.create(&promo).await?;
    info!("Created promo code {} ({}%)", created.code, created.discount_percent);

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "promo_code": created }))))
}

pub async fn update_promo_code(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(promo_id): Path<String>,
    Json(payload): Json<UpdatePromoCodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut promo = state.promo_code_repo.find_by_id(&promo_id).await?
        .ok_or(AppError::NotFound("Promo code not found".into()))?;

    if let Some(code) = payload.code { promo.code = validate_code(&code)?; }
    if let Some(desc) = payload.description { promo.description = Some(desc); }
    if let Some(percent) = payload.discount_percent { promo.discount_percent = validate_percent(percent)?; }
    if let Some(active) = payload.is_active { promo.window.is_active = active; }
    if let Some(from) = payload.valid_from { promo.window.valid_from = Some(from); }
    if let Some(until) = payload.valid_until { promo.window.valid_until = Some(until); }
    if let Some(max) = payload.max_usage { promo.window.max_usage = Some(max); }
    if payload.reset_usage == Some(true) { promo.window.usage_count = 0; }

    promo.window.validate_shape().map_err(AppError::Validation)?;
    promo.updated_at = state.clock.now();

    let updated = state.promo_code_repo.update(&promo).await?;
    info!("Updated promo code {}", updated.code);
    Ok(Json(json!({ "success": true, "promo_code": updated })))
}

pub async fn delete_promo_code(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(promo_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.promo_code_repo.delete(&promo_id).await?;
    info!("Deleted promo code {}", promo_id);
    Ok(Json(json!({ "success": true })))
}
