use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};
use std::fmt;
use std::str::FromStr;

use super::status::{StatusFlow, UnknownStatus};
use super::validity::ValidityWindow;

const CODE_PREFIX: &str = "GC-";
const CODE_LENGTH: usize = 10;

/// Upper bound on a card's lifetime, roughly a century.
pub const MAX_VALIDITY_DAYS: i64 = 36_500;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct GiftCard {
    pub id: String,
    pub code: String,
    pub amount_cents: i64,
    pub order_id: Option<String>,
    pub recipient_name: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub window: ValidityWindow,
    pub created_at: DateTime<Utc>,
}

impl GiftCard {
    /// Issues a single-use card valid from `now` for `validity_days`, clamped to
    /// `1..=MAX_VALIDITY_DAYS`. Returns `None` when the expiry is not a representable date.
    pub fn issue(order: &GiftCardOrder, now: DateTime<Utc>, validity_days: i64) -> Option<Self> {
        let lifetime = Duration::try_days(validity_days.clamp(1, MAX_VALIDITY_DAYS))?;
        let valid_until = now.checked_add_signed(lifetime)?;

        Some(Self {
            id: Uuid::new_v4().to_string(),
            code: generate_code(),
            amount_cents: order.amount_cents,
            order_id: Some(order.id.clone()),
            recipient_name: Some(order.recipient_name.clone()),
            window: ValidityWindow {
                is_active: true,
                valid_from: Some(now),
                valid_until: Some(valid_until),
                usage_count: 0,
                max_usage: Some(1),
            },
            created_at: now,
        })
    }
}

pub fn generate_code() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{}{}", CODE_PREFIX, suffix)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftCardOrderStatus {
    Pending,
    Paid,
    Sent,
    Failed,
}

impl GiftCardOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftCardOrderStatus::Pending => "pending",
            GiftCardOrderStatus::Paid => "paid",
            GiftCardOrderStatus::Sent => "sent",
            GiftCardOrderStatus::Failed => "failed",
        }
    }
}

impl StatusFlow for GiftCardOrderStatus {
    const ENTITY: &'static str = "gift card order";

    fn allowed_next(self) -> &'static [Self] {
        match self {
            GiftCardOrderStatus::Pending => &[GiftCardOrderStatus::Paid],
            GiftCardOrderStatus::Paid => &[GiftCardOrderStatus::Sent, GiftCardOrderStatus::Failed],
            GiftCardOrderStatus::Failed => &[GiftCardOrderStatus::Sent],
            GiftCardOrderStatus::Sent => &[],
        }
    }
}

impl fmt::Display for GiftCardOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GiftCardOrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(GiftCardOrderStatus::Pending),
            // "completed" is the legacy label for a settled payment
            "paid" | "completed" => Ok(GiftCardOrderStatus::Paid),
            "sent" => Ok(GiftCardOrderStatus::Sent),
            "failed" => Ok(GiftCardOrderStatus::Failed),
            _ => Err(UnknownStatus { entity: "gift card order", label: s.to_string() }),
        }
    }
}

impl TryFrom<String> for GiftCardOrderStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct GiftCardOrder {
    pub id: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub recipient_name: String,
    pub recipient_email: Option<String>,
    pub amount_cents: i64,
    pub message: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: GiftCardOrderStatus,
    pub gift_card_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewGiftCardOrderParams {
    pub buyer_name: String,
    pub buyer_email: String,
    pub recipient_name: String,
    pub recipient_email: Option<String>,
    pub amount_cents: i64,
    pub message: Option<String>,
}

impl GiftCardOrder {
    pub fn new(params: NewGiftCardOrderParams, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            buyer_name: params.buyer_name,
            buyer_email: params.buyer_email,
            recipient_name: params.recipient_name,
            recipient_email: params.recipient_email,
            amount_cents: params.amount_cents,
            message: params.message,
            status: GiftCardOrderStatus::Pending,
            gift_card_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order() -> GiftCardOrder {
        let placed = Utc.with_ymd_and_hms(2026, 10, 18, 15, 30, 0).unwrap();
        GiftCardOrder::new(NewGiftCardOrderParams {
            buyer_name: "Ada".into(),
            buyer_email: "ada@example.com".into(),
            recipient_name: "Grace".into(),
            recipient_email: None,
            amount_cents: 15_000,
            message: None,
        }, placed)
    }

    #[test]
    fn test_order_flow() {
        use GiftCardOrderStatus::*;
        assert_eq!(Pending.transition_to(Paid), Ok(Paid));
        assert_eq!(Paid.transition_to(Sent), Ok(Sent));
        assert_eq!(Paid.transition_to(Failed), Ok(Failed));
        assert_eq!(Failed.transition_to(Sent), Ok(Sent));
        assert!(Pending.transition_to(Sent).is_err());
        assert!(Sent.transition_to(Paid).is_err());
        assert!(Paid.transition_to(Paid).is_err());
    }

    #[test]
    fn test_legacy_completed_reads_as_paid() {
        assert_eq!("completed".parse::<GiftCardOrderStatus>(), Ok(GiftCardOrderStatus::Paid));
        assert_eq!(GiftCardOrderStatus::Paid.as_str(), "paid");
        assert!("refunded".parse::<GiftCardOrderStatus>().is_err());
    }

    #[test]
    fn test_issue_card_from_order() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let order = order();
        let card = GiftCard::issue(&order, now, 365).unwrap();

        assert!(card.code.starts_with("GC-"));
        assert_eq!(card.code.len(), 13);
        assert!(card.code[3..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert_eq!(card.amount_cents, 15_000);
        assert_eq!(card.order_id.as_deref(), Some(order.id.as_str()));
        assert_eq!(card.window.max_usage, Some(1));
        assert_eq!(card.window.valid_until, Some(now + Duration::days(365)));
        assert!(card.window.is_valid_at(now));
        assert_eq!(card.created_at, now);
        assert_eq!(order.created_at, Utc.with_ymd_and_hms(2026, 10, 18, 15, 30, 0).unwrap());
    }

    #[test]
    fn test_issue_clamps_validity_days() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let order = order();

        let card = GiftCard::issue(&order, now, 1_000_000_000_000).unwrap();
        assert_eq!(card.window.valid_until, Some(now + Duration::days(MAX_VALIDITY_DAYS)));

        let card = GiftCard::issue(&order, now, i64::MAX).unwrap();
        assert_eq!(card.window.valid_until, Some(now + Duration::days(MAX_VALIDITY_DAYS)));

        let card = GiftCard::issue(&order, now, -20).unwrap();
        assert_eq!(card.window.valid_until, Some(now + Duration::days(1)));
    }

    #[test]
    fn test_issue_near_the_end_of_time_is_none() {
        let order = order();
        assert!(GiftCard::issue(&order, DateTime::<Utc>::MAX_UTC, 1).is_none());
    }
}
