use crate::domain::models::setting::SettingType;
use crate::domain::models::validity::ValidityWindow;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub name: String,
    pub email: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct BookingListQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Body of every `.../status` endpoint. Parsed against the entity's own status enum.
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct UpsertSettingRequest {
    pub value: Value,
    #[serde(rename = "type")]
    pub value_type: Option<SettingType>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize)]
pub struct PublicSettingEntry {
    pub key: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub value_type: Option<SettingType>,
}

#[derive(Deserialize)]
pub struct PublicSettingsBatch {
    pub settings: Vec<PublicSettingEntry>,
}

#[derive(Deserialize)]
pub struct WindowRequest {
    pub is_active: Option<bool>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub max_usage: Option<i32>,
}

impl WindowRequest {
    /// New windows start unused. `is_active` defaults to `default_active`.
    pub fn into_window(self, default_active: bool, usage_count: i32) -> ValidityWindow {
        ValidityWindow {
            is_active: self.is_active.unwrap_or(default_active),
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            usage_count,
            max_usage: self.max_usage,
        }
    }
}

#[derive(Deserialize)]
pub struct CreatePromoCodeRequest {
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    #[serde(flatten)]
    pub window: WindowRequest,
}

#[derive(Deserialize)]
pub struct UpdatePromoCodeRequest {
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_percent: Option<i32>,
    pub is_active: Option<bool>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub max_usage: Option<i32>,
    pub reset_usage: Option<bool>,
}

#[derive(Deserialize)]
pub struct ValidatePromoCodeRequest {
    pub code: String,
    pub amount_cents: Option<i64>,
}

#[derive(Deserialize)]
pub struct RedeemPromoCodeRequest {
    pub code: String,
}

#[derive(Deserialize)]
pub struct CreateGiftCardOrderRequest {
    pub buyer_name: String,
    pub buyer_email: String,
    pub recipient_name: String,
    pub recipient_email: Option<String>,
    pub amount_cents: i64,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateChallengeRequest {
    pub discount_percent: i32,
    #[serde(flatten)]
    pub window: WindowRequest,
}

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub amount_cents: Option<i64>,
}
