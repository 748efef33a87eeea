use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::validity::ValidityWindow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PromoCode {
    pub id: String,
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub window: ValidityWindow,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PromoCode {
    pub fn new(code: &str, description: Option<String>, discount_percent: i32, window: ValidityWindow, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: normalize_code(code),
            description,
            discount_percent,
            window,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Codes are matched case-insensitively and stored upper-case.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
