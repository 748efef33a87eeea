use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use chrono_tz::Tz;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::api::extractors::admin::digest_token;
use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{
    BookingRepository, ChallengeRepository, Clock, GiftCardOrderRepository,
    GiftCardRepository, PromoCodeRepository, SettingRepository,
};
use crate::domain::services::settings_cache::SettingsCache;
use crate::infra::clock::SystemClock;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_setting_repo::PostgresSettingRepo,
    postgres_promo_code_repo::PostgresPromoCodeRepo, postgres_challenge_repo::PostgresChallengeRepo,
    postgres_gift_card_repo::{PostgresGiftCardOrderRepo, PostgresGiftCardRepo},
    sqlite_booking_repo::SqliteBookingRepo, sqlite_setting_repo::SqliteSettingRepo,
    sqlite_promo_code_repo::SqlitePromoCodeRepo, sqlite_challenge_repo::SqliteChallengeRepo,
    sqlite_gift_card_repo::{SqliteGiftCardOrderRepo, SqliteGiftCardRepo},
};

/// One implementation per persistence port, all backed by the same pool.
pub struct Repositories {
    pub booking: Arc<dyn BookingRepository>,
    pub setting: Arc<dyn SettingRepository>,
    pub promo_code: Arc<dyn PromoCodeRepository>,
    pub gift_card: Arc<dyn GiftCardRepository>,
    pub gift_card_order: Arc<dyn GiftCardOrderRepository>,
    pub challenge: Arc<dyn ChallengeRepository>,
}

impl Repositories {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Self {
            booking: Arc::new(SqliteBookingRepo::new(pool.clone())),
            setting: Arc::new(SqliteSettingRepo::new(pool.clone())),
            promo_code: Arc::new(SqlitePromoCodeRepo::new(pool.clone())),
            gift_card: Arc::new(SqliteGiftCardRepo::new(pool.clone())),
            gift_card_order: Arc::new(SqliteGiftCardOrderRepo::new(pool.clone())),
            challenge: Arc::new(SqliteChallengeRepo::new(pool)),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            booking: Arc::new(PostgresBookingRepo::new(pool.clone())),
            setting: Arc::new(PostgresSettingRepo::new(pool.clone())),
            promo_code: Arc::new(PostgresPromoCodeRepo::new(pool.clone())),
            gift_card: Arc::new(PostgresGiftCardRepo::new(pool.clone())),
            gift_card_order: Arc::new(PostgresGiftCardOrderRepo::new(pool.clone())),
            challenge: Arc::new(PostgresChallengeRepo::new(pool)),
        }
    }
}

/// Wires repositories, clock and the settings cache into the shared state.
pub fn assemble_state(config: &Config, clock: Arc<dyn Clock>, repos: Repositories) -> AppState {
    let studio_tz = Tz::from_str(&config.studio_timezone)
        .expect("STUDIO_TIMEZONE must be a valid IANA time zone");

    let settings = Arc::new(SettingsCache::new(
        repos.setting.clone(),
        clock.clone(),
        Duration::from_secs(config.settings_cache_ttl_secs),
    ));

    AppState {
        config: config.clone(),
        clock,
        studio_tz,
        admin_token_hash: config.admin_token.as_deref().map(digest_token),
        booking_repo: repos.booking,
        setting_repo: repos.setting,
        promo_code_repo: repos.promo_code,
        gift_card_repo: repos.gift_card,
        gift_card_order_repo: repos.gift_card_order,
        challenge_repo: repos.challenge,
        settings,
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if config.admin_token.is_none() {
        warn!("ADMIN_TOKEN is not set, admin routes will reject every request");
    }

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        Repositories::postgres(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        Repositories::sqlite(pool)
    };

    assemble_state(config, Arc::new(SystemClock), repos)
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
