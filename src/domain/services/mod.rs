pub mod availability;
pub mod pricing;
pub mod settings_cache;
