use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{QuoteQuery, UpdateChallengeRequest};
use crate::api::dtos::responses::ChallengeQuoteResponse;
use crate::domain::models::challenge::ChallengeSetting;
use crate::domain::services::pricing::{apply_percent_discount, no_discount, validate_amount};
use crate::domain::services::settings_cache::CHALLENGE_ENABLED;
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;
use tracing::info;

pub async fn get_challenge(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let challenge = state.challenge_repo.get().await?
        .unwrap_or_else(|| ChallengeSetting::inactive(state.clock.now()));
    Ok(Json(json!({ "success": true, "challenge": challenge })))
}

pub async fn update_challenge(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<UpdateChallengeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(0..=100).contains(&payload.discount_percent) {
        return Err(AppError::Validation("discount_percent must be between 0 and 100".into()));
    }

    let usage_count = state.challenge_repo.get().await?
        .map(|c| c.window.usage_count)
        .unwrap_or(0);

    let window = payload.window.into_window(false, usage_count);
    window.validate_shape().map_err(AppError::Validation)?;

    let setting = ChallengeSetting {
        discount_percent: payload.discount_percent,
        window,
        updated_at: state.clock.now(),
    };

    let saved = state.challenge_repo.upsert(&setting).await?;
    info!("Challenge discount set to {}% (active: {})", saved.discount_percent, saved.window.is_active);

    Ok(Json(json!({ "success": true, "challenge": saved })))
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let amount = validate_amount(query.amount_cents.unwrap_or(0)).map_err(AppError::Validation)?;

    let enabled = state.settings.get_bool(CHALLENGE_ENABLED, true).await;
    let challenge = state.challenge_repo.get().await?;

    let active_percent = challenge
        .filter(|c| enabled && c.window.is_valid_at(state.clock.now()))
        .map(|c| c.discount_percent);

    let response = match active_percent {
        Some(percent) => ChallengeQuoteResponse {
            success: true,
            active: true,
            discount_percent: percent,
            pricing: apply_percent_discount(amount, percent),
        },
        None => ChallengeQuoteResponse {
            success: true,
            active: false,
            discount_percent: 0,
            pricing: no_discount(amount),
        },
    };

    Ok(Json(response))
}
