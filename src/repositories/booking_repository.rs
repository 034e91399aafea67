use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingPeriod, BookingStatus};
use crate::services::booking_service::{BookingStore, NewBooking};
use crate::utils::errors::{AppError, AppResult};

/// Fila de reserva con los datos del rental, para listados
#[derive(Debug, sqlx::FromRow)]
pub struct BookingWithRental {
    pub id: Uuid,
    pub rental_id: Uuid,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub unit: String,
    pub total_price: Decimal,
    pub status: String,
    pub notes: Option<String>,
    pub contract_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub rental_title: String,
    pub rental_location: Option<String>,
    pub rental_images: Option<sqlx::types::Json<Vec<String>>>,
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM rental_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding booking: {}", e)))?;

        Ok(booking)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<BookingWithRental>> {
        let bookings = sqlx::query_as::<_, BookingWithRental>(
            r#"
            SELECT b.id, b.rental_id, b.user_id, b.start_date, b.end_date, b.unit, b.total_price,
                   b.status, b.notes, b.contract_path, b.created_at,
                   r.title AS rental_title, r.location AS rental_location, r.images AS rental_images
            FROM rental_bookings b
            JOIN rentals r ON r.id = b.rental_id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing bookings: {}", e)))?;

        Ok(bookings)
    }

    pub async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE rental_bookings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error updating booking status: {}", e)))?;

        Ok(booking)
    }

    pub async fn set_contract_path(&self, id: Uuid, contract_path: &str) -> AppResult<Booking> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE rental_bookings SET contract_path = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(contract_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error setting contract path: {}", e)))?;

        Ok(booking)
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn has_overlapping(
        &self,
        rental_id: Uuid,
        period: &BookingPeriod,
    ) -> Result<bool, AppError> {
        // semiabierto: [s1,e1) solapa [s2,e2) sii s1 < e2 AND s2 < e1;
        // las reservas canceladas no bloquean
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM rental_bookings
                WHERE rental_id = $1
                  AND status != 'cancelled'
                  AND start_date < $2
                  AND end_date > $3
            )
            "#,
        )
        .bind(rental_id)
        .bind(period.end())
        .bind(period.start())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error checking overlap: {}", e)))?;

        Ok(result.0)
    }

    async fn insert(&self, new: NewBooking) -> Result<Booking, AppError> {
        let id = Uuid::new_v4();

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO rental_bookings (id, rental_id, user_id, start_date, end_date, unit, total_price, status, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new.rental_id)
        .bind(new.user_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.unit.as_str())
        .bind(new.total_price)
        .bind(BookingStatus::Pending.as_str())
        .bind(new.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating booking: {}", e)))?;

        Ok(booking)
    }
}
