use crate::domain::{
    models::gift_card::{GiftCard, GiftCardOrder, GiftCardOrderStatus},
    ports::{GiftCardOrderRepository, GiftCardRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, Utc};

pub struct SqliteGiftCardRepo {
    pool: SqlitePool,
}

impl SqliteGiftCardRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GiftCardRepository for SqliteGiftCardRepo {
    async fn find_by_code(&self, code: &str) -> Result<Option<GiftCard>, AppError> {
        sqlx::query_as::<_, GiftCard>("SELECT * FROM gift_cards WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<GiftCard>, AppError> {
        sqlx::query_as::<_, GiftCard>("SELECT * FROM gift_cards WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn redeem(&self, code: &str, now: DateTime<Utc>) -> Result<Option<GiftCard>, AppError> {
        sqlx::query_as::<_, GiftCard>(
            "UPDATE gift_cards SET usage_count = usage_count + 1
             WHERE code = ? AND is_active
               AND (valid_from IS NULL OR valid_from <= ?)
               AND (valid_until IS NULL OR valid_until >= ?)
               AND (max_usage IS NULL OR usage_count < max_usage)
             RETURNING *"
        )
            .bind(code).bind(now).bind(now)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}

pub struct SqliteGiftCardOrderRepo {
    pool: SqlitePool,
}

impl SqliteGiftCardOrderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GiftCardOrderRepository for SqliteGiftCardOrderRepo {
    async fn create(&self, order: &GiftCardOrder) -> Result<GiftCardOrder, AppError> {
        sqlx::query_as::<_, GiftCardOrder>(
            "INSERT INTO gift_card_orders (id, buyer_name, buyer_email, recipient_name, recipient_email, amount_cents, message, status, gift_card_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&order.id).bind(&order.buyer_name).bind(&order.buyer_email)
            .bind(&order.recipient_name).bind(&order.recipient_email).bind(order.amount_cents)
            .bind(&order.message).bind(order.status.as_str()).bind(&order.gift_card_id)
            .bind(order.created_at).bind(order.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<GiftCardOrder>, AppError> {
        sqlx::query_as::<_, GiftCardOrder>("SELECT * FROM gift_card_orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<GiftCardOrder>, AppError> {
        sqlx::query_as::<_, GiftCardOrder>("SELECT * FROM gift_card_orders ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: GiftCardOrderStatus, now: DateTime<Utc>) -> Result<GiftCardOrder, AppError> {
        sqlx::query_as::<_, GiftCardOrder>("UPDATE gift_card_orders SET status = ?, updated_at = ? WHERE id = ? RETURNING *")
            .bind(status.as_str()).bind(now).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Gift card order not found".into()))
    }

    async fn mark_paid_with_card(&self, order_id: &str, card: &GiftCard) -> Result<GiftCardOrder, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            "INSERT INTO gift_cards (id, code, amount_cents, order_id, recipient_name, is_active, valid_from, valid_until, usage_count, max_usage, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&card.id).bind(&card.code).bind(card.amount_cents).bind(&card.order_id).bind(&card.recipient_name)
            .bind(card.window.is_active).bind(card.window.valid_from).bind(card.window.valid_until)
            .bind(card.window.usage_count).bind(card.window.max_usage).bind(card.created_at)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, GiftCardOrder>(
            "UPDATE gift_card_orders SET status = ?, gift_card_id = ?, updated_at = ?
             WHERE id = ? AND status = ?
             RETURNING *"
        )
            .bind(GiftCardOrderStatus::Paid.as_str()).bind(&card.id).bind(card.created_at)
            .bind(order_id).bind(GiftCardOrderStatus::Pending.as_str())
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::Conflict("Order is no longer pending".into()))?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
