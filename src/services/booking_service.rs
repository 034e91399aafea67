//! Motor de disponibilidad y reservas
//!
//! Valida una solicitud de reserva contra las reservas existentes y
//! calcula el presupuesto (quote). Por intento de reserva el resultado
//! es terminal: disponible+cotizado, rechazado por solapamiento o
//! rechazado por falta de precio; el motor nunca reintenta.
//!
//! La secuencia check-then-insert se serializa por rental mediante
//! `RentalLockRegistry`; rentals distintos no se coordinan entre sí.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingPeriod};
use crate::models::rental::{Rental, RentalUnit};
use crate::services::pricing_service::{self, RentalPrices};
use crate::state::RentalLockRegistry;
use crate::utils::errors::AppError;

/// Datos para insertar una reserva nueva
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub rental_id: Uuid,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub unit: RentalUnit,
    pub total_price: Decimal,
    pub notes: Option<String>,
}

/// Resultado efímero del cálculo de precio para una reserva prospectiva.
/// Se materializa en la reserva al crearla; no se persiste por sí mismo.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub unit: RentalUnit,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Acceso a reservas persistidas que necesita el motor.
///
/// La implementación real es `BookingRepository` (sqlx); los tests usan
/// un store en memoria.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// ¿Existe alguna reserva NO cancelada del rental que intersecte
    /// el período [start, end)?
    async fn has_overlapping(
        &self,
        rental_id: Uuid,
        period: &BookingPeriod,
    ) -> Result<bool, AppError>;

    /// Insertar una reserva nueva con estado pending
    async fn insert(&self, booking: NewBooking) -> Result<Booking, AppError>;
}

/// Calcular el presupuesto para un período y una unidad explícita.
/// Falla con NoPriceForUnit si la unidad no tiene precio directo ni
/// derivable; nunca sustituye otra unidad.
pub fn quote(
    prices: &RentalPrices,
    period: &BookingPeriod,
    unit: RentalUnit,
) -> Result<Quote, AppError> {
    let unit_price = pricing_service::require_unit_price(prices, unit)?;
    let quantity = period.billable_quantity(unit);
    let total = period.total_for(unit, unit_price);
    Ok(Quote {
        unit,
        quantity,
        unit_price,
        total,
    })
}

/// Motor de disponibilidad y creación de reservas
pub struct BookingEngine<S> {
    store: S,
    locks: RentalLockRegistry,
}

impl<S: BookingStore> BookingEngine<S> {
    pub fn new(store: S, locks: RentalLockRegistry) -> Self {
        Self { store, locks }
    }

    /// Consultar disponibilidad del rental para el período dado
    pub async fn check_availability(
        &self,
        rental_id: Uuid,
        period: &BookingPeriod,
    ) -> Result<bool, AppError> {
        Ok(!self.store.has_overlapping(rental_id, period).await?)
    }

    /// Crear una reserva: disponibilidad primero (sin trabajo adicional
    /// si falla), después presupuesto, después un único insert con
    /// estado pending. Toda la secuencia corre bajo el lock del rental.
    pub async fn create_booking(
        &self,
        rental: &Rental,
        user_id: Uuid,
        period: BookingPeriod,
        unit: RentalUnit,
        notes: Option<String>,
    ) -> Result<(Booking, Quote), AppError> {
        let lock = self.locks.acquire(rental.id).await;
        let _guard = lock.lock().await;

        if self.store.has_overlapping(rental.id, &period).await? {
            return Err(AppError::SlotUnavailable(format!(
                "El rental '{}' ya tiene una reserva en el período solicitado",
                rental.id
            )));
        }

        let quote = quote(&RentalPrices::of(rental), &period, unit)?;

        let booking = self
            .store
            .insert(NewBooking {
                rental_id: rental.id,
                user_id,
                start_date: period.start(),
                end_date: period.end(),
                unit,
                total_price: quote.total,
                notes,
            })
            .await?;

        Ok((booking, quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingStatus;
    use chrono::TimeZone;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Store en memoria con la misma semántica de solapamiento que el
    /// repositorio real (semiabierto, cancelled excluido)
    #[derive(Clone, Default)]
    struct InMemoryBookingStore {
        bookings: Arc<Mutex<Vec<Booking>>>,
    }

    impl InMemoryBookingStore {
        async fn push(&self, booking: Booking) {
            self.bookings.lock().await.push(booking);
        }

        async fn count(&self) -> usize {
            self.bookings.lock().await.len()
        }
    }

    #[async_trait]
    impl BookingStore for InMemoryBookingStore {
        async fn has_overlapping(
            &self,
            rental_id: Uuid,
            period: &BookingPeriod,
        ) -> Result<bool, AppError> {
            let bookings = self.bookings.lock().await;
            Ok(bookings.iter().any(|b| {
                b.rental_id == rental_id
                    && b.status != BookingStatus::Cancelled.as_str()
                    && period.overlaps(b.start_date, b.end_date)
            }))
        }

        async fn insert(&self, new: NewBooking) -> Result<Booking, AppError> {
            let booking = Booking {
                id: Uuid::new_v4(),
                rental_id: new.rental_id,
                user_id: new.user_id,
                start_date: new.start_date,
                end_date: new.end_date,
                unit: new.unit.as_str().to_string(),
                total_price: new.total_price,
                status: BookingStatus::Pending.as_str().to_string(),
                notes: new.notes,
                contract_path: None,
                created_at: Utc::now(),
            };
            self.push(booking.clone()).await;
            Ok(booking)
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rental_with_prices(
        per_day: Option<Decimal>,
        per_week: Option<Decimal>,
        per_month: Option<Decimal>,
    ) -> Rental {
        Rental {
            id: Uuid::new_v4(),
            title: "Citroën C3".to_string(),
            brand: Some("Citroën".to_string()),
            model: Some("C3".to_string()),
            year: Some(2021),
            price_per_day: per_day,
            price_per_week: per_week,
            price_per_month: per_month,
            provider_type: "company".to_string(),
            location: Some("Paris".to_string()),
            owner_user_id: None,
            description: None,
            images: None,
            created_at: Utc::now(),
        }
    }

    fn engine() -> BookingEngine<InMemoryBookingStore> {
        BookingEngine::new(InMemoryBookingStore::default(), RentalLockRegistry::new())
    }

    #[test]
    fn test_quote_two_days_at_day_rate() {
        let prices = RentalPrices::new(Some(dec("90")), Some(dec("550")), Some(dec("2000")));
        let period = BookingPeriod::new(at(2025, 1, 1, 10, 0), at(2025, 1, 3, 10, 0)).unwrap();
        let q = quote(&prices, &period, RentalUnit::Day).unwrap();
        assert_eq!(q.quantity, 2);
        assert_eq!(q.unit_price, dec("90"));
        assert_eq!(q.total, dec("180"));
        // total es exactamente precio × cantidad
        assert_eq!(q.total, q.unit_price * Decimal::from(q.quantity));
    }

    #[test]
    fn test_quote_half_hour_at_derived_hour_rate() {
        let prices = RentalPrices::new(Some(dec("90")), Some(dec("550")), Some(dec("2000")));
        let period = BookingPeriod::new(at(2025, 1, 1, 10, 0), at(2025, 1, 1, 10, 30)).unwrap();
        let q = quote(&prices, &period, RentalUnit::Hour).unwrap();
        assert_eq!(q.quantity, 1);
        assert_eq!(q.unit_price, dec("3.75"));
        assert_eq!(q.total, dec("3.75"));
    }

    #[test]
    fn test_quote_fails_without_price_for_explicit_unit() {
        let prices = RentalPrices::new(Some(dec("90")), None, None);
        let period = BookingPeriod::new(at(2025, 1, 1, 0, 0), at(2025, 1, 8, 0, 0)).unwrap();
        assert!(matches!(
            quote(&prices, &period, RentalUnit::Week),
            Err(AppError::NoPriceForUnit(_))
        ));
    }

    #[tokio::test]
    async fn test_back_to_back_bookings_are_available() {
        let engine = engine();
        let rental = rental_with_prices(Some(dec("90")), None, None);

        let first = BookingPeriod::new(at(2025, 1, 1, 10, 0), at(2025, 1, 3, 10, 0)).unwrap();
        engine
            .create_booking(&rental, Uuid::new_v4(), first, RentalUnit::Day, None)
            .await
            .unwrap();

        // empieza exactamente cuando termina la anterior: sin conflicto
        let adjacent = BookingPeriod::new(at(2025, 1, 3, 10, 0), at(2025, 1, 5, 10, 0)).unwrap();
        assert!(engine.check_availability(rental.id, &adjacent).await.unwrap());
    }

    #[tokio::test]
    async fn test_overlapping_booking_is_rejected_without_insert() {
        let engine = engine();
        let rental = rental_with_prices(Some(dec("90")), None, None);

        let first = BookingPeriod::new(at(2025, 1, 1, 10, 0), at(2025, 1, 3, 10, 0)).unwrap();
        engine
            .create_booking(&rental, Uuid::new_v4(), first, RentalUnit::Day, None)
            .await
            .unwrap();

        let overlapping = BookingPeriod::new(at(2025, 1, 2, 0, 0), at(2025, 1, 4, 0, 0)).unwrap();
        let result = engine
            .create_booking(&rental, Uuid::new_v4(), overlapping, RentalUnit::Day, None)
            .await;
        assert!(matches!(result, Err(AppError::SlotUnavailable(_))));
        assert_eq!(engine.store.count().await, 1);
    }

    #[tokio::test]
    async fn test_availability_is_checked_before_pricing() {
        // rental sin precio alguno pero con reserva solapada: el rechazo
        // debe ser SlotUnavailable, no NoPriceForUnit
        let engine = engine();
        let rental = rental_with_prices(None, None, None);

        let existing = Booking {
            id: Uuid::new_v4(),
            rental_id: rental.id,
            user_id: Uuid::new_v4(),
            start_date: at(2025, 1, 1, 0, 0),
            end_date: at(2025, 1, 5, 0, 0),
            unit: "day".to_string(),
            total_price: dec("360"),
            status: "confirmed".to_string(),
            notes: None,
            contract_path: None,
            created_at: Utc::now(),
        };
        engine.store.push(existing).await;

        let period = BookingPeriod::new(at(2025, 1, 2, 0, 0), at(2025, 1, 3, 0, 0)).unwrap();
        let result = engine
            .create_booking(&rental, Uuid::new_v4(), period, RentalUnit::Day, None)
            .await;
        assert!(matches!(result, Err(AppError::SlotUnavailable(_))));
    }

    #[tokio::test]
    async fn test_no_price_rejection_creates_nothing() {
        let engine = engine();
        let rental = rental_with_prices(None, None, None);

        let period = BookingPeriod::new(at(2025, 1, 2, 0, 0), at(2025, 1, 3, 0, 0)).unwrap();
        let result = engine
            .create_booking(&rental, Uuid::new_v4(), period, RentalUnit::Day, None)
            .await;
        assert!(matches!(result, Err(AppError::NoPriceForUnit(_))));
        assert_eq!(engine.store.count().await, 0);
    }

    #[tokio::test]
    async fn test_cancelled_bookings_do_not_block() {
        let engine = engine();
        let rental = rental_with_prices(Some(dec("90")), None, None);

        let cancelled = Booking {
            id: Uuid::new_v4(),
            rental_id: rental.id,
            user_id: Uuid::new_v4(),
            start_date: at(2025, 1, 1, 0, 0),
            end_date: at(2025, 1, 10, 0, 0),
            unit: "day".to_string(),
            total_price: dec("810"),
            status: "cancelled".to_string(),
            notes: None,
            contract_path: None,
            created_at: Utc::now(),
        };
        engine.store.push(cancelled).await;

        let period = BookingPeriod::new(at(2025, 1, 2, 0, 0), at(2025, 1, 4, 0, 0)).unwrap();
        let (booking, q) = engine
            .create_booking(&rental, Uuid::new_v4(), period, RentalUnit::Day, None)
            .await
            .unwrap();
        assert_eq!(booking.status, "pending");
        assert_eq!(q.quantity, 2);
    }

    #[tokio::test]
    async fn test_concurrent_overlapping_requests_exactly_one_wins() {
        let engine = Arc::new(engine());
        let rental = rental_with_prices(Some(dec("90")), None, None);

        let mut handles = Vec::new();
        for _ in 0..2 {
            let engine = engine.clone();
            let rental = rental.clone();
            handles.push(tokio::spawn(async move {
                let period =
                    BookingPeriod::new(at(2025, 1, 1, 10, 0), at(2025, 1, 3, 10, 0)).unwrap();
                engine
                    .create_booking(&rental, Uuid::new_v4(), period, RentalUnit::Day, None)
                    .await
            }));
        }

        let mut successes = 0;
        let mut slot_unavailable = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AppError::SlotUnavailable(_)) => slot_unavailable += 1,
                Err(e) => panic!("error inesperado: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(slot_unavailable, 1);
        assert_eq!(engine.store.count().await, 1);
    }
}
