use crate::domain::models::setting::{Setting, SettingType, SettingValue};
use crate::domain::models::validity::InvalidReason;
use crate::domain::services::availability::AvailabilityEstimate;
use crate::domain::services::pricing::PriceBreakdown;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub success: bool,
    #[serde(flatten)]
    pub estimate: AvailabilityEstimate,
}

#[derive(Serialize)]
pub struct PublicSettingsResponse {
    pub success: bool,
    pub settings: BTreeMap<String, SettingValue>,
}

/// Admin view of a setting: decoded value plus its tag and visibility.
#[derive(Serialize)]
pub struct SettingView {
    pub key: String,
    pub value: SettingValue,
    #[serde(rename = "type")]
    pub value_type: SettingType,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Setting> for SettingView {
    fn from(setting: Setting) -> Self {
        Self {
            value: setting.decoded(),
            key: setting.key,
            value_type: setting.value_type,
            is_public: setting.is_public,
            updated_at: setting.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct PromoValidationResponse {
    pub success: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PriceBreakdown>,
}

#[derive(Serialize)]
pub struct GiftCardCheckResponse {
    pub success: bool,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
    pub amount_cents: i64,
    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ChallengeQuoteResponse {
    pub success: bool,
    pub active: bool,
    pub discount_percent: i32,
    pub pricing: PriceBreakdown,
}
