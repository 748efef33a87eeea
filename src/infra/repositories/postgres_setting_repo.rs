use crate::domain::{models::setting::Setting, ports::SettingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresSettingRepo {
    pool: PgPool,
}

impl PostgresSettingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingRepository for PostgresSettingRepo {
    async fn list_all(&self) -> Result<Vec<Setting>, AppError> {
        sqlx::query_as::<_, Setting>("SELECT * FROM settings ORDER BY key ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find(&self, key: &str) -> Result<Option<Setting>, AppError> {
        sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upsert(&self, setting: &Setting) -> Result<Setting, AppError> {
        sqlx::query_as::<_, Setting>(
            "INSERT INTO settings (key, value, value_type, is_public, updated_at) VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, value_type = EXCLUDED.value_type,
                 is_public = EXCLUDED.is_public, updated_at = EXCLUDED.updated_at
             RETURNING *"
        )
            .bind(&setting.key)
            .bind(&setting.value)
            .bind(setting.value_type.as_str())
            .bind(setting.is_public)
            .bind(setting.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Setting not found".into()));
        }
        Ok(())
    }
}
