pub mod sqlite_booking_repo;
pub mod sqlite_setting_repo;
pub mod sqlite_promo_code_repo;
pub mod sqlite_gift_card_repo;
pub mod sqlite_challenge_repo;

pub mod postgres_booking_repo;
pub mod postgres_setting_repo;
pub mod postgres_promo_code_repo;
pub mod postgres_gift_card_repo;
pub mod postgres_challenge_repo;
