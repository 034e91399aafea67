use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::rental::Rental;
use crate::utils::errors::{AppError, AppResult};

/// Filtros de búsqueda del catálogo de rentals
#[derive(Debug, Default)]
pub struct RentalFilters {
    pub q: Option<String>,
    pub provider_type: Option<String>,
    /// Ventana de disponibilidad [start, end): solo rentals sin reserva
    /// activa que intersecte la ventana
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
}

pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        title: String,
        brand: Option<String>,
        model: Option<String>,
        year: Option<i32>,
        price_per_day: Option<Decimal>,
        price_per_week: Option<Decimal>,
        price_per_month: Option<Decimal>,
        provider_type: String,
        location: Option<String>,
        owner_user_id: Option<Uuid>,
        description: Option<String>,
        images: Option<Vec<String>>,
    ) -> AppResult<Rental> {
        let id = Uuid::new_v4();

        let rental = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (id, title, brand, model, year, price_per_day, price_per_week, price_per_month, provider_type, location, owner_user_id, description, images, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(brand)
        .bind(model)
        .bind(year)
        .bind(price_per_day)
        .bind(price_per_week)
        .bind(price_per_month)
        .bind(provider_type)
        .bind(location)
        .bind(owner_user_id)
        .bind(description)
        .bind(images.map(sqlx::types::Json))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error creating rental: {}", e)))?;

        Ok(rental)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding rental: {}", e)))?;

        Ok(rental)
    }

    /// Buscar rentals aplicando los filtros presentes. El SQL se arma
    /// dinámicamente y los binds siguen el mismo orden que las cláusulas.
    pub async fn search(&self, filters: &RentalFilters) -> AppResult<Vec<Rental>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut arg_idx = 1;

        if filters.q.is_some() {
            conditions.push(format!(
                "(title ILIKE ${i} OR location ILIKE ${i})",
                i = arg_idx
            ));
            arg_idx += 1;
        }

        if filters.provider_type.is_some() {
            conditions.push(format!("provider_type = ${}", arg_idx));
            arg_idx += 1;
        }

        // intervalos semiabiertos: reserva activa solapa la ventana sii
        // start_date < window_end AND end_date > window_start
        if filters.available_from.is_some() && filters.available_to.is_some() {
            conditions.push(format!(
                "NOT EXISTS (SELECT 1 FROM rental_bookings b WHERE b.rental_id = rentals.id AND b.status != 'cancelled' AND b.start_date < ${} AND b.end_date > ${})",
                arg_idx,
                arg_idx + 1
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT * FROM rentals{} ORDER BY price_per_day ASC NULLS LAST",
            where_clause
        );

        let mut query = sqlx::query_as::<_, Rental>(&sql);

        if let Some(q) = &filters.q {
            query = query.bind(format!("%{}%", q));
        }
        if let Some(provider_type) = &filters.provider_type {
            query = query.bind(provider_type.clone());
        }
        if let (Some(from), Some(to)) = (filters.available_from, filters.available_to) {
            query = query.bind(to).bind(from);
        }

        let rentals = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error searching rentals: {}", e)))?;

        Ok(rentals)
    }
}
