use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub studio_timezone: String,
    pub admin_token: Option<String>,
    pub settings_cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            studio_timezone: env::var("STUDIO_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            settings_cache_ttl_secs: env::var("SETTINGS_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("SETTINGS_CACHE_TTL_SECS must be a number"),
        }
    }
}
