//! Modelo de RentalBooking
//!
//! Este módulo contiene el struct Booking, el enum de estados y el
//! período semiabierto [start, end) con su aritmética de solapamiento
//! y cantidad facturable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::rental::RentalUnit;
use crate::utils::errors::AppError;

/// Estado de la reserva
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(AppError::BadRequest(format!(
                "Estado desconocido '{}'. Valores permitidos: pending, confirmed, cancelled",
                other
            ))),
        }
    }
}

/// Reserva persistida - mapea exactamente a la tabla rental_bookings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
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
}

/// Período semiabierto [start, end) de una reserva.
///
/// La construcción garantiza end > start; dos períodos adyacentes
/// (uno termina exactamente cuando el otro empieza) NO se solapan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::InvalidInterval(format!(
                "end ({}) debe ser posterior a start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Intersección no vacía de intervalos semiabiertos:
    /// [s1,e1) y [s2,e2) se solapan sii s1 < e2 AND s2 < e1
    pub fn overlaps(&self, other_start: DateTime<Utc>, other_end: DateTime<Utc>) -> bool {
        self.start < other_end && other_start < self.end
    }

    /// Cantidad de unidades a facturar: duración transcurrida dividida
    /// por la duración de la unidad, redondeada SIEMPRE hacia arriba,
    /// con mínimo de 1.
    pub fn billable_quantity(&self, unit: RentalUnit) -> i64 {
        let seconds = (self.end - self.start).num_seconds();
        let div = unit.duration_secs();
        std::cmp::max(1, (seconds + div - 1) / div)
    }

    /// Total = precio unitario × cantidad facturable
    pub fn total_for(&self, unit: RentalUnit, unit_price: Decimal) -> Decimal {
        unit_price * Decimal::from(self.billable_quantity(unit))
    }
}
