use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::booking::Booking;
use crate::repositories::booking_repository::BookingWithRental;

// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub rental_id: uuid::Uuid,

    // timestamps RFC3339
    pub start_at: String,
    pub end_at: String,

    // hour | day | week | month | year
    pub unit: String,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

// Request para transicionar el estado de una reserva (partner/admin)
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

// Request para adjuntar la referencia del contrato generado aguas abajo
#[derive(Debug, Deserialize, Validate)]
pub struct AttachContractRequest {
    #[validate(length(min = 1, max = 500))]
    pub contract_path: String,
}

// Response tras crear una reserva, con el desglose del presupuesto
#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    pub id: String,
    pub unit: String,
    pub quantity: i64,
    pub unit_price: String,
    pub total: String,
    pub status: String,
}

// Response de reserva individual
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub rental_id: String,
    pub start_date: String,
    pub end_date: String,
    pub unit: String,
    pub total_price: String,
    pub status: String,
    pub notes: Option<String>,
    pub contract_path: Option<String>,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            rental_id: booking.rental_id.to_string(),
            start_date: booking.start_date.to_rfc3339(),
            end_date: booking.end_date.to_rfc3339(),
            unit: booking.unit,
            total_price: format!("{:.2}", booking.total_price),
            status: booking.status,
            notes: booking.notes,
            contract_path: booking.contract_path,
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}

// Resumen del rental embebido en el listado de reservas
#[derive(Debug, Serialize)]
pub struct BookingRentalSummary {
    pub title: String,
    pub location: Option<String>,
    pub thumbnail: Option<String>,
}

// Response de reserva para listados del usuario
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub id: String,
    pub rental_id: String,
    pub rental: BookingRentalSummary,
    pub start_date: String,
    pub end_date: String,
    pub unit: String,
    pub total_price: String,
    pub status: String,
    pub contract_path: Option<String>,
    pub created_at: String,
}

impl From<BookingWithRental> for BookingListResponse {
    fn from(row: BookingWithRental) -> Self {
        let thumbnail = row
            .rental_images
            .as_ref()
            .and_then(|imgs| imgs.0.first().cloned());
        Self {
            id: row.id.to_string(),
            rental_id: row.rental_id.to_string(),
            rental: BookingRentalSummary {
                title: row.rental_title,
                location: row.rental_location,
                thumbnail,
            },
            start_date: row.start_date.to_rfc3339(),
            end_date: row.end_date.to_rfc3339(),
            unit: row.unit,
            total_price: format!("{:.2}", row.total_price),
            status: row.status,
            contract_path: row.contract_path,
            created_at: row.created_at.to_rfc3339(),
        }
    }
}
