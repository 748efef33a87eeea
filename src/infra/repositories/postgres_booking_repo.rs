use crate::domain::{models::booking::{Booking, BookingStatus}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::{DateTime, NaiveDate, Utc};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("INSERT INTO bookings (id, date, start_time, end_time, status, customer_name, customer_email, notes, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *").bind(&booking.id).bind(booking.date).bind(booking.start_time).bind(booking.end_time).bind(booking.status.as_str()).bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.notes).bind(booking.created_at).bind(booking.updated_at).fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE ($1::date IS NULL OR date >= $1) AND ($2::date IS NULL OR date <= $2) ORDER BY date ASC, start_time ASC").bind(from).bind(to).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_active_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE date >= $1 AND date <= $2 AND status != 'cancelled' ORDER BY date ASC").bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_status(&self, id: &str, status: BookingStatus, now: DateTime<Utc>) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *").bind(status.as_str()).bind(now).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?.ok_or(AppError::NotFound("Booking not found".into()))
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Booking not found".into())); }
        Ok(())
    }
}
