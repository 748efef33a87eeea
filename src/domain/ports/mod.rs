use crate::domain::models::{
    booking::{Booking, BookingStatus}, setting::Setting, promo_code::PromoCode,
    gift_card::{GiftCard, GiftCardOrder, GiftCardOrderStatus}, challenge::ChallengeSetting,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now". Injected so TTLs and validity windows can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Vec<Booking>, AppError>;
    /// Non-cancelled bookings with `start <= date <= end`.
    async fn list_active_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>, AppError>;
    async fn update_status(&self, id: &str, status: BookingStatus, now: DateTime<Utc>) -> Result<Booking, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SettingRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Setting>, AppError>;
    async fn find(&self, key: &str) -> Result<Option<Setting>, AppError>;
    async fn upsert(&self, setting: &Setting) -> Result<Setting, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PromoCodeRepository: Send + Sync {
    async fn create(&self, promo: &PromoCode) -> Result<PromoCode, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<PromoCode>, AppError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, AppError>;
    async fn list(&self) -> Result<Vec<PromoCode>, AppError>;
    /// Writes every mutable column, `updated_at` included.
    async fn update(&self, promo: &PromoCode) -> Result<PromoCode, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    /// Increments usage only while the code is still valid at `now`. `None` if it was not.
    async fn redeem(&self, code: &str, now: DateTime<Utc>) -> Result<Option<PromoCode>, AppError>;
}

#[async_trait]
pub trait GiftCardRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<GiftCard>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<GiftCard>, AppError>;
    async fn redeem(&self, code: &str, now: DateTime<Utc>) -> Result<Option<GiftCard>, AppError>;
}

#[async_trait]
pub trait GiftCardOrderRepository: Send + Sync {
    async fn create(&self, order: &GiftCardOrder) -> Result<GiftCardOrder, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<GiftCardOrder>, AppError>;
    async fn list(&self) -> Result<Vec<GiftCardOrder>, AppError>;
    async fn update_status(&self, id: &str, status: GiftCardOrderStatus, now: DateTime<Utc>) -> Result<GiftCardOrder, AppError>;
    /// Inserts the card and marks the order paid in one transaction, stamped with the card's `created_at`.
    async fn mark_paid_with_card(&self, order_id: &str, card: &GiftCard) -> Result<GiftCardOrder, AppError>;
}

#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    async fn get(&self) -> Result<Option<ChallengeSetting>, AppError>;
    async fn upsert(&self, setting: &ChallengeSetting) -> Result<ChallengeSetting, AppError>;
}
