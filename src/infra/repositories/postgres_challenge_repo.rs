use crate::domain::{models::challenge::ChallengeSetting, ports::ChallengeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresChallengeRepo {
    pool: PgPool,
}

impl PostgresChallengeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChallengeRepository for PostgresChallengeRepo {
    async fn get(&self) -> Result<Option<ChallengeSetting>, AppError> {
        sqlx::query_as::<_, ChallengeSetting>("SELECT * FROM challenge_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, setting: &ChallengeSetting) -> Result<ChallengeSetting, AppError> {
        sqlx::query_as::<_, ChallengeSetting>(
            "INSERT INTO challenge_settings (id, discount_percent, is_active, valid_from, valid_until, usage_count, max_usage, updated_at)
             VALUES (1, $1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET discount_percent = EXCLUDED.discount_percent, is_active = EXCLUDED.is_active,
                 valid_from = EXCLUDED.valid_from, valid_until = EXCLUDED.valid_until, usage_count = EXCLUDED.usage_count,
                 max_usage = EXCLUDED.max_usage, updated_at = EXCLUDED.updated_at
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
