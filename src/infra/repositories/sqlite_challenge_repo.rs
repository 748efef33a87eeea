use crate::domain::{models::challenge::ChallengeSetting, ports::ChallengeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteChallengeRepo {
    pool: SqlitePool,
}

impl SqliteChallengeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChallengeRepository for SqliteChallengeRepo {
    async fn get(&self) -> Result<Option<ChallengeSetting>, AppError> {
        sqlx::query_as::<_, ChallengeSetting>("SELECT * FROM challenge_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, setting: &ChallengeSetting) -> Result<ChallengeSetting, AppError> {
        sqlx::query_as::<_, ChallengeSetting>(
            "INSERT INTO challenge_settings (id, discount_percent, is_active, valid_from, valid_until, usage_count, max_usage, updated_at)
             VALUES (1, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET discount_percent = excluded.discount_percent, is_active = excluded.is_active,
                 valid_from = excluded.valid_from, valid_until = excluded.valid_until, usage_count = excluded.usage_count,
                 max_usage = excluded.max_usage, updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(setting.discount_percent)
            .bind(setting.window.is_active)
            .bind(setting.window.valid_from)
            .bind(setting.window.valid_until)
            .bind(setting.window.usage_count)
            .bind(setting.window.max_usage)
            .bind(setting.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
