use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use validator::Validate;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

// Request para crear un rental
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRentalRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1950, max = 2030))]
    pub year: Option<i32>,

    pub price_per_day: Option<Decimal>,
    pub price_per_week: Option<Decimal>,
    pub price_per_month: Option<Decimal>,

    // company | individual; por defecto company
    pub provider_type: Option<String>,

    #[validate(length(min = 2, max = 120))]
    pub location: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub images: Option<Vec<String>>,
}

// Filtros de búsqueda del catálogo
#[derive(Debug, Deserialize)]
pub struct RentalSearchQuery {
    pub q: Option<String>,
    pub provider_type: Option<String>,
    pub unit: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

// Tarjeta de rental para listados, con el precio resuelto
#[derive(Debug, Serialize)]
pub struct RentalCardResponse {
    pub id: String,
    pub title: String,
    pub location: Option<String>,
    pub provider_type: String,
    pub images: Vec<String>,
    pub price: Option<String>,
    pub price_unit: Option<String>,
}

// Detalle de rental con el mapa completo de precios por unidad
#[derive(Debug, Serialize)]
pub struct RentalDetailResponse {
    pub id: String,
    pub title: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub location: Option<String>,
    pub provider_type: String,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub units: serde_json::Value,
    pub price: Option<String>,
    pub price_unit: Option<String>,
    pub created_at: String,
}

// Response de rental tras crearlo
#[derive(Debug, Serialize)]
pub struct RentalResponse {
    pub id: String,
    pub title: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price_per_day: Option<String>,
    pub price_per_week: Option<String>,
    pub price_per_month: Option<String>,
    pub provider_type: String,
    pub location: Option<String>,
    pub created_at: String,
}

// Query de disponibilidad: ventana [start, end) en RFC3339
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub rental_id: String,
    pub available: bool,
}

// Query de presupuesto: ventana + unidad explícita
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub start: String,
    pub end: String,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub rental_id: String,
    pub unit: String,
    pub quantity: i64,
    pub unit_price: String,
    pub total: String,
}
