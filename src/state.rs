use std::sync::Arc;
use chrono::NaiveDate;
use chrono_tz::Tz;
use crate::domain::ports::{
    BookingRepository, ChallengeRepository, Clock, GiftCardOrderRepository,
    GiftCardRepository, PromoCodeRepository, SettingRepository,
};
use crate::domain::services::settings_cache::SettingsCache;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub studio_tz: Tz,
    pub admin_token_hash: Option<String>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub setting_repo: Arc<dyn SettingRepository>,
    pub promo_code_repo: Arc<dyn PromoCodeRepository>,
    pub gift_card_repo: Arc<dyn GiftCardRepository>,
    pub gift_card_order_repo: Arc<dyn GiftCardOrderRepository>,
    pub challenge_repo: Arc<dyn ChallengeRepository>,
    pub settings: Arc<SettingsCache>,
}

impl AppState {
    /// Calendar date in the studio's time zone.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.studio_tz).date_naive()
    }
}
