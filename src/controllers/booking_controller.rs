use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{
    AttachContractRequest, BookingCreatedResponse, BookingListResponse, BookingResponse,
    CreateBookingRequest, UpdateBookingStatusRequest,
};
use crate::dto::rental_dto::ApiResponse;
use crate::models::booking::{BookingPeriod, BookingStatus};
use crate::models::rental::RentalUnit;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::rental_repository::RentalRepository;
use crate::services::booking_service::BookingEngine;
use crate::state::RentalLockRegistry;
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::validate_datetime;

pub struct BookingController {
    rentals: RentalRepository,
    bookings: BookingRepository,
    engine: BookingEngine<BookingRepository>,
    locks: RentalLockRegistry,
}

impl BookingController {
    pub fn new(pool: PgPool, locks: RentalLockRegistry) -> Self {
        Self {
            rentals: RentalRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            engine: BookingEngine::new(BookingRepository::new(pool), locks.clone()),
            locks,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<BookingCreatedResponse>, AppError> {
        request.validate()?;

        let rental = self
            .rentals
            .find_by_id(request.rental_id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &request.rental_id.to_string()))?;

        let start = validate_datetime(&request.start_at)
            .map_err(|_| validation_error("start_at", "formato RFC3339 requerido"))?;
        let end = validate_datetime(&request.end_at)
            .map_err(|_| validation_error("end_at", "formato RFC3339 requerido"))?;
        let period = BookingPeriod::new(start, end)?;

        let unit: RentalUnit = request.unit.parse()?;

        let (booking, quote) = self
            .engine
            .create_booking(&rental, user_id, period, unit, request.notes)
            .await?;

        // la reserva ya está confirmada en la base; los locks sin uso
        // se pueden liberar
        self.locks.cleanup_unused().await;

        let response = BookingCreatedResponse {
            id: booking.id.to_string(),
            unit: quote.unit.as_str().to_string(),
            quantity: quote.quantity,
            unit_price: format!("{:.2}", quote.unit_price),
            total: format!("{:.2}", quote.total),
            status: booking.status,
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Reserva creada exitosamente".to_string(),
        ))
    }

    pub async fn mine(&self, user_id: Uuid) -> Result<Vec<BookingListResponse>, AppError> {
        let rows = self.bookings.find_by_user(user_id).await?;
        Ok(rows.into_iter().map(BookingListResponse::from).collect())
    }

    pub async fn cancel(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        if booking.user_id != user_id {
            return Err(AppError::Forbidden(
                "No tienes permiso para cancelar esta reserva".to_string(),
            ));
        }

        if booking.status == BookingStatus::Cancelled.as_str() {
            return Err(AppError::Conflict(
                "La reserva ya está cancelada".to_string(),
            ));
        }

        let cancelled = self
            .bookings
            .update_status(id, BookingStatus::Cancelled)
            .await?;

        Ok(ApiResponse::success(BookingResponse::from(cancelled)))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateBookingStatusRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let status: BookingStatus = request.status.parse()?;

        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        // una reserva cancelada dejó de bloquear el calendario; no se
        // puede reactivar sin volver a pasar por el chequeo de
        // disponibilidad
        if booking.status == BookingStatus::Cancelled.as_str()
            && status != BookingStatus::Cancelled
        {
            return Err(AppError::Conflict(
                "Una reserva cancelada no puede reactivarse".to_string(),
            ));
        }

        let updated = self.bookings.update_status(id, status).await?;

        Ok(ApiResponse::success_with_message(
            BookingResponse::from(updated),
            "Estado de la reserva actualizado".to_string(),
        ))
    }

    /// El contrato lo genera un colaborador externo una vez que la
    /// reserva existe; aquí solo se persiste la referencia.
    pub async fn attach_contract(
        &self,
        id: Uuid,
        request: AttachContractRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        request.validate()?;

        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        let updated = self
            .bookings
            .set_contract_path(id, &request.contract_path)
            .await?;

        Ok(ApiResponse::success(BookingResponse::from(updated)))
    }
}
