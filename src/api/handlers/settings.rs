use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{PublicSettingsBatch, UpsertSettingRequest};
use crate::api::dtos::responses::{PublicSettingsResponse, SettingView};
use crate::domain::models::setting::{SettingType, SettingValue};
use crate::error::AppError;
use std::sync::Arc;
use serde_json::{json, Value};
use tracing::info;

const MAX_KEY_LEN: usize = 100;

fn validate_key(key: &str) -> Result<&str, AppError> {
    let key = key.trim();
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(AppError::Validation(format!("Setting key must be 1..={} characters", MAX_KEY_LEN)));
    }
    Ok(key)
}

fn coerce(value_type: Option<SettingType>, value: Value) -> Result<SettingValue, AppError> {
    let value_type = value_type.unwrap_or_else(|| SettingType::infer(&value));
    SettingValue::from_json(value_type, value).map_err(AppError::Validation)
}

pub async fn get_public_settings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.public().await;
    Ok(Json(PublicSettingsResponse { success: true, settings }))
}

pub async fn upsert_public_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<PublicSettingsBatch>,
) -> Result<impl IntoResponse, AppError> {
    let mut parsed = Vec::with_capacity(payload.settings.len());
    for entry in payload.settings {
        let key = validate_key(&entry.key)?.to_string();
        let value = coerce(entry.value_type, entry.value)?;
        parsed.push((key, value));
    }

    for (key, value) in &parsed {
        state.settings.set(key, value.clone(), true).await?;
    }
    info!("Updated {} public settings", parsed.len());

    let settings = state.settings.public().await;
    Ok(Json(PublicSettingsResponse { success: true, settings }))
}

pub async fn list_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let settings: Vec<SettingView> = state.setting_repo.list_all().await?
        .into_iter()
        .map(SettingView::from)
        .collect();
    Ok(Json(json!({ "success": true, "settings": settings })))
}

pub async fn upsert_setting(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(key): Path<String>,
    Json(payload): Json<UpsertSettingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let key = validate_key(&key)?;
    let value = coerce(payload.value_type, payload.value)?;

    let is_public = match payload.is_public {
        Some(flag) => flag,
        None => state.setting_repo.find(key).await?.is_some_and(|s| s.is_public),
    };

    let saved = state.settings.set(key, value, is_public).await?;
    Ok(Json(json!({ "success": true, "setting": SettingView::from(saved) })))
}

pub async fn delete_setting(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.settings.remove(&key).await?;
    Ok(Json(json!({ "success": true })))
}
