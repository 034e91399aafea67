//! Modelo de Rental
//!
//! Este módulo contiene el struct Rental y los enums de dominio del
//! marketplace de alquiler. Mapea exactamente al schema PostgreSQL
//! con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Unidad de facturación de un alquiler
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RentalUnit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl RentalUnit {
    /// Duración de la unidad en segundos.
    /// Mes = 30 días y año = 365 días; aproximación fija, no calendario.
    pub fn duration_secs(&self) -> i64 {
        match self {
            RentalUnit::Hour => 3_600,
            RentalUnit::Day => 86_400,
            RentalUnit::Week => 604_800,
            RentalUnit::Month => 2_592_000,
            RentalUnit::Year => 31_536_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RentalUnit::Hour => "hour",
            RentalUnit::Day => "day",
            RentalUnit::Week => "week",
            RentalUnit::Month => "month",
            RentalUnit::Year => "year",
        }
    }
}

impl std::fmt::Display for RentalUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RentalUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(RentalUnit::Hour),
            "day" => Ok(RentalUnit::Day),
            "week" => Ok(RentalUnit::Week),
            "month" => Ok(RentalUnit::Month),
            "year" => Ok(RentalUnit::Year),
            other => Err(AppError::BadRequest(format!(
                "Unidad desconocida '{}'. Valores permitidos: hour, day, week, month, year",
                other
            ))),
        }
    }
}

/// Tipo de proveedor del rental
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Company,
    Individual,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Company => "company",
            ProviderType::Individual => "individual",
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(ProviderType::Company),
            "individual" => Ok(ProviderType::Individual),
            other => Err(AppError::BadRequest(format!(
                "Tipo de proveedor desconocido '{}'",
                other
            ))),
        }
    }
}

/// Rental principal - mapea exactamente a la tabla rentals.
/// Los tres precios son dispersos: cualquiera puede faltar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rental {
    pub id: Uuid,
    pub title: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price_per_day: Option<Decimal>,
    pub price_per_week: Option<Decimal>,
    pub price_per_month: Option<Decimal>,
    pub provider_type: String,
    pub location: Option<String>,
    pub owner_user_id: Option<Uuid>,
    pub description: Option<String>,
    pub images: Option<sqlx::types::Json<Vec<String>>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_str() {
        assert_eq!("day".parse::<RentalUnit>().unwrap(), RentalUnit::Day);
        assert_eq!("hour".parse::<RentalUnit>().unwrap(), RentalUnit::Hour);
        assert!("fortnight".parse::<RentalUnit>().is_err());
    }

    #[test]
    fn test_unit_duration_secs() {
        assert_eq!(RentalUnit::Hour.duration_secs(), 3_600);
        assert_eq!(RentalUnit::Day.duration_secs(), 86_400);
        assert_eq!(RentalUnit::Week.duration_secs(), 604_800);
        // mes y año son aproximaciones fijas (30 y 365 días)
        assert_eq!(RentalUnit::Month.duration_secs(), 30 * 86_400);
        assert_eq!(RentalUnit::Year.duration_secs(), 365 * 86_400);
    }

    #[test]
    fn test_provider_type_from_str() {
        assert_eq!(
            "company".parse::<ProviderType>().unwrap(),
            ProviderType::Company
        );
        assert!("workshop".parse::<ProviderType>().is_err());
    }
}
