use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{CreateGiftCardOrderRequest, UpdateStatusRequest};
use crate::api::dtos::responses::GiftCardCheckResponse;
use crate::domain::models::gift_card::{GiftCard, GiftCardOrder, GiftCardOrderStatus, NewGiftCardOrderParams};
use crate::domain::models::status::StatusFlow;
use crate::domain::services::settings_cache::GIFT_CARD_VALIDITY_DAYS;
use crate::error::AppError;
use std::sync::Arc;
use serde_json::json;
use tracing::info;

const DEFAULT_VALIDITY_DAYS: f64 = 365.0;

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateGiftCardOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.amount_cents <= 0 {
        return Err(AppError::Validation("amount_cents must be positive".into()));
    }
    if payload.buyer_name.trim().is_empty() || payload.recipient_name.trim().is_empty() {
        return Err(AppError::Validation("Buyer and recipient names are required".into()));
    }
    if !payload.buyer_email.contains('@') {
        return Err(AppError::Validation("A valid buyer email is required".into()));
    }

    let order = GiftCardOrder::new(NewGiftCardOrderParams {
        buyer_name: payload.buyer_name.trim().to_string(),
        buyer_email: payload.buyer_email.trim().to_string(),
        recipient_name: payload.recipient_name.trim().to_string(),
        recipient_email: payload.recipient_email,
        amount_cents: payload.amount_cents,
        message: payload.message,
    }, state.clock.now());

    let created = state.gift_card_order_repo.create(&order).await?;
    info!("Gift card order {} created for {} cents", created.id, created.amount_cents);

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "order": created }))))
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = state.gift_card_order_repo.list().await?;
    Ok(Json(json!({ "success": true, "orders": orders })))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.gift_card_order_repo.find_by_id(&order_id).await?
        .ok_or(AppError::NotFound("Gift card order not found".into()))?;

    let gift_card = match &order.gift_card_id {
        Some(card_id) => state.gift_card_repo.find_by_id(card_id).await?,
        None => None,
    };

    Ok(Json(json!({ "success": true, "order": order, "gift_card": gift_card })))
}

pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(order_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let requested: GiftCardOrderStatus = payload.status.parse()?;

    let order = state.gift_card_order_repo.find_by_id(&order_id).await?
        .ok_or(AppError::NotFound("Gift card order not found".into()))?;

    let next = order.status.transition_to(requested)?;

    if next == GiftCardOrderStatus::Paid {
        let days = state.settings.get_number(GIFT_CARD_VALIDITY_DAYS, DEFAULT_VALIDITY_DAYS).await;
        // Float to int casts saturate, and `issue` clamps the range.
        let card = GiftCard::issue(&order, state.clock.now(), days.round() as i64)
            .ok_or_else(|| AppError::InternalWithMsg("Gift card expiry is out of range".into()))?;

        let updated = state.gift_card_order_repo.mark_paid_with_card(&order.id, &card).await?;
        info!("Gift card order {} paid, issued card {}", order.id, card.id);

        return Ok(Json(json!({ "success": true, "order": updated, "gift_card": card })));
    }

    let updated = state.gift_card_order_repo.update_status(&order.id, next, state.clock.now()).await?;
    info!("Gift card order {} moved {} -> {}", order.id, order.status, updated.status);

    Ok(Json(json!({ "success": true, "order": updated })))
}

pub async fn check_gift_card(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let code = code.trim().to_ascii_uppercase();
    let card = state.gift_card_repo.find_by_code(&code).await?
        .ok_or(AppError::NotFound("Gift card not found".into()))?;

    let reason = card.window.check(state.clock.now()).err();

    Ok(Json(GiftCardCheckResponse {
        success: true,
        valid: reason.is_none(),
        reason,
        amount_cents: card.amount_cents,
        valid_until: card.window.valid_until,
    }))
}

pub async fn redeem_gift_card(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let code = code.trim().to_ascii_uppercase();
    let now = state.clock.now();

    match state.gift_card_repo.redeem(&code, now).await? {
        Some(card) => {
            info!("Gift card {} redeemed", card.id);
            Ok(Json(json!({ "success": true, "gift_card": card })))
        }
        None => {
            let card = state.gift_card_repo.find_by_code(&code).await?
                .ok_or(AppError::NotFound("Gift card not found".into()))?;
            let message = card.window.check(now)
                .err()
                .map(|r| r.message())
                .unwrap_or("Gift card could not be redeemed");
            Err(AppError::Conflict(message.into()))
        }
    }
}
