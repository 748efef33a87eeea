pub mod booking;
pub mod challenge;
pub mod gift_card;
pub mod health;
pub mod promo_code;
pub mod settings;
