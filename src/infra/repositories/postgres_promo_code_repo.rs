use crate::domain::{models::promo_code::PromoCode, ports::PromoCodeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, Utc};

pub struct PostgresPromoCodeRepo {
    pool: PgPool,
}

impl PostgresPromoCodeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PromoCodeRepository for PostgresPromoCodeRepo {
    async fn create(&self, promo: &PromoCode) -> Result<PromoCode, AppError> {
        sqlx::query_as::<_, PromoCode>(
            "INSERT INTO promo_codes (id, code, description, discount_percent, is_active, valid_from, valid_until, usage_count, max_usage, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *"
        )
            .bind(&promo.id).bind(&promo.code).bind(&promo.description).bind(promo.discount_percent)
            .bind(promo.window.is_active).bind(promo.window.valid_from).bind(promo.window.valid_until)
            .bind(promo.window.usage_count).bind(promo.window.max_usage)
            .bind(promo.created_at).bind(promo.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PromoCode>, AppError> {
        sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, AppError> {
        sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<PromoCode>, AppError> {
        sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, promo: &PromoCode) -> Result<PromoCode, AppError> {
        sqlx::query_as::<_, PromoCode>(
            "UPDATE promo_codes SET code=$1, description=$2, discount_percent=$3, is_active=$4, valid_from=$5, valid_until=$6, usage_count=$7, max_usage=$8, updated_at=$9
             WHERE id=$10
             RETURNING *"
        )
            .bind(&promo.code).bind(&promo.description).bind(promo.discount_percent)
            .bind(promo.window.is_active).bind(promo.window.valid_from).bind(promo.window.valid_until)
            .bind(promo.window.usage_count).bind(promo.window.max_usage).bind(promo.updated_at)
            .bind(&promo.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Promo code not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Promo code not found".into()));
        }
        Ok(())
    }

    async fn redeem(&self, code: &str, now: DateTime<Utc>) -> Result<Option<PromoCode>, AppError> {
        sqlx::query_as::<_, PromoCode>(
            "UPDATE promo_codes SET usage_count = usage_count + 1, updated_at = $1
             WHERE code = $2 AND is_active
               AND (valid_from IS NULL OR valid_from <= $1)
               AND (valid_until IS NULL OR valid_until >= $1)
               AND (max_usage IS NULL OR usage_count < max_usage)
             RETURNING *"
        )
            .bind(now).bind(code)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
