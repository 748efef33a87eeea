pub mod booking;
pub mod challenge;
pub mod gift_card;
pub mod promo_code;
pub mod setting;
pub mod status;
pub mod validity;
