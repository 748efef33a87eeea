use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::validity::ValidityWindow;

/// Singleton row holding the photo challenge discount.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ChallengeSetting {
    pub discount_percent: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub window: ValidityWindow,
    pub updated_at: DateTime<Utc>,
}

impl ChallengeSetting {
    /// What an unconfigured studio reports: no discount, switched off.
    pub fn inactive(now: DateTime<Utc>) -> Self {
        Self {
            discount_percent: 0,
            window: ValidityWindow {
                is_active: false,
                valid_from: None,
                valid_until: None,
                usage_count: 0,
                max_usage: None,
            },
            updated_at: now,
        }
    }
}
