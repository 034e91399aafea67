use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::rental_dto::{
    ApiResponse, AvailabilityQuery, AvailabilityResponse, CreateRentalRequest, QuoteQuery,
    QuoteResponse, RentalCardResponse, RentalDetailResponse, RentalResponse, RentalSearchQuery,
};
use crate::models::booking::BookingPeriod;
use crate::models::rental::{ProviderType, Rental, RentalUnit};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::rental_repository::{RentalFilters, RentalRepository};
use crate::services::booking_service::{self, BookingEngine};
use crate::services::pricing_service::{
    resolve_default_price, resolve_unit_price, RentalPrices, UnitPriceMap,
};
use crate::state::RentalLockRegistry;
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::{validate_datetime, validate_enum, validate_non_negative, validate_not_empty};

pub struct RentalController {
    repository: RentalRepository,
    engine: BookingEngine<BookingRepository>,
}

impl RentalController {
    pub fn new(pool: PgPool, locks: RentalLockRegistry) -> Self {
        Self {
            repository: RentalRepository::new(pool.clone()),
            engine: BookingEngine::new(BookingRepository::new(pool), locks),
        }
    }

    pub async fn list(
        &self,
        query: RentalSearchQuery,
    ) -> Result<Vec<RentalCardResponse>, AppError> {
        // unidad desconocida en el listado se ignora, no es un error
        let unit_filter: Option<RentalUnit> =
            query.unit.as_deref().and_then(|u| u.parse().ok());

        // solo se filtra por proveedor si el valor es válido
        let provider_filter = query
            .provider_type
            .as_deref()
            .and_then(|p| p.parse::<ProviderType>().ok())
            .map(|p| p.as_str().to_string());

        // ventana de disponibilidad opcional; fechas inválidas o
        // invertidas se ignoran igual que en el resto del catálogo
        let mut available_from = None;
        let mut available_to = None;
        if let (Some(start), Some(end)) = (query.start.as_deref(), query.end.as_deref()) {
            if let (Ok(start), Ok(end)) = (validate_datetime(start), validate_datetime(end)) {
                if end > start {
                    available_from = Some(start);
                    available_to = Some(end);
                }
            }
        }

        let filters = RentalFilters {
            q: query.q.clone().filter(|s| !s.trim().is_empty()),
            provider_type: provider_filter,
            available_from,
            available_to,
        };

        let rentals = self.repository.search(&filters).await?;

        let items = rentals
            .into_iter()
            .filter_map(|rental| {
                let prices = RentalPrices::of(&rental);
                match unit_filter {
                    // unidad solicitada: solo rentals con precio directo
                    // o derivable para esa unidad
                    Some(unit) => resolve_unit_price(&prices, unit)
                        .map(|price| Self::card(rental, Some((unit, price)))),
                    // sin unidad: cadena de preferencia por defecto; el
                    // rental se conserva aunque no tenga precio alguno
                    None => Some(Self::card(rental, resolve_default_price(&prices))),
                }
            })
            .collect();

        Ok(items)
    }

    fn card(rental: Rental, resolved: Option<(RentalUnit, rust_decimal::Decimal)>) -> RentalCardResponse {
        RentalCardResponse {
            id: rental.id.to_string(),
            title: rental.title,
            location: rental.location,
            provider_type: rental.provider_type,
            images: rental.images.map(|imgs| imgs.0).unwrap_or_default(),
            price: resolved.map(|(_, price)| format!("{:.2}", price)),
            price_unit: resolved.map(|(unit, _)| unit.as_str().to_string()),
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<RentalDetailResponse, AppError> {
        let rental = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        let prices = RentalPrices::of(&rental);
        let price_map = UnitPriceMap::from_prices(&prices);
        if price_map.is_empty() {
            tracing::warn!("⚠️ Rental '{}' no tiene precios configurados", rental.id);
        }

        let mut units = std::collections::BTreeMap::new();
        for (unit, price) in price_map.entries() {
            units.insert(unit.as_str().to_string(), format!("{:.2}", price));
        }
        let units = serde_json::to_value(units)
            .map_err(|e| AppError::Internal(format!("Error serializing unit prices: {}", e)))?;

        let best = resolve_default_price(&prices);

        Ok(RentalDetailResponse {
            id: rental.id.to_string(),
            title: rental.title,
            brand: rental.brand,
            model: rental.model,
            year: rental.year,
            location: rental.location,
            provider_type: rental.provider_type,
            images: rental.images.map(|imgs| imgs.0).unwrap_or_default(),
            description: rental.description,
            units,
            price: best.map(|(_, price)| format!("{:.2}", price)),
            price_unit: best.map(|(unit, _)| unit.as_str().to_string()),
            created_at: rental.created_at.to_rfc3339(),
        })
    }

    pub async fn create(
        &self,
        owner_user_id: Uuid,
        request: CreateRentalRequest,
    ) -> Result<ApiResponse<RentalResponse>, AppError> {
        request.validate()?;

        validate_not_empty(&request.title)
            .map_err(|_| validation_error("title", "el título es requerido"))?;

        // al menos un precio de origen para que el rental sea reservable
        if request.price_per_day.is_none()
            && request.price_per_week.is_none()
            && request.price_per_month.is_none()
        {
            return Err(AppError::ValidationError(
                "Al menos un precio (día, semana o mes) es requerido".to_string(),
            ));
        }

        for (field, price) in [
            ("price_per_day", request.price_per_day),
            ("price_per_week", request.price_per_week),
            ("price_per_month", request.price_per_month),
        ] {
            if let Some(price) = price {
                validate_non_negative(price).map_err(|_| {
                    AppError::ValidationError(format!("{} debe ser mayor o igual a 0", field))
                })?;
            }
        }

        let provider_type = request
            .provider_type
            .unwrap_or_else(|| "company".to_string());
        validate_enum(provider_type.as_str(), &["company", "individual"])
            .map_err(|_| validation_error("provider_type", "debe ser company o individual"))?;

        let rental = self
            .repository
            .create(
                request.title,
                request.brand,
                request.model,
                request.year,
                request.price_per_day,
                request.price_per_week,
                request.price_per_month,
                provider_type,
                request.location,
                Some(owner_user_id),
                request.description,
                request.images,
            )
            .await?;

        let response = RentalResponse {
            id: rental.id.to_string(),
            title: rental.title,
            brand: rental.brand,
            model: rental.model,
            year: rental.year,
            price_per_day: rental.price_per_day.map(|p| format!("{:.2}", p)),
            price_per_week: rental.price_per_week.map(|p| format!("{:.2}", p)),
            price_per_month: rental.price_per_month.map(|p| format!("{:.2}", p)),
            provider_type: rental.provider_type,
            location: rental.location,
            created_at: rental.created_at.to_rfc3339(),
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Rental creado exitosamente".to_string(),
        ))
    }

    pub async fn check_availability(
        &self,
        id: Uuid,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityResponse, AppError> {
        let rental = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        let start = validate_datetime(&query.start)
            .map_err(|_| validation_error("start", "formato RFC3339 requerido"))?;
        let end = validate_datetime(&query.end)
            .map_err(|_| validation_error("end", "formato RFC3339 requerido"))?;
        let period = BookingPeriod::new(start, end)?;

        let available = self.engine.check_availability(rental.id, &period).await?;

        Ok(AvailabilityResponse {
            rental_id: rental.id.to_string(),
            available,
        })
    }

    pub async fn quote(&self, id: Uuid, query: QuoteQuery) -> Result<QuoteResponse, AppError> {
        let rental = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Rental", &id.to_string()))?;

        let start = validate_datetime(&query.start)
            .map_err(|_| validation_error("start", "formato RFC3339 requerido"))?;
        let end = validate_datetime(&query.end)
            .map_err(|_| validation_error("end", "formato RFC3339 requerido"))?;
        let period = BookingPeriod::new(start, end)?;

        // la unidad del presupuesto es explícita; no hay fallback
        let unit: RentalUnit = query.unit.parse()?;

        let quote = booking_service::quote(&RentalPrices::of(&rental), &period, unit)?;

        Ok(QuoteResponse {
            rental_id: rental.id.to_string(),
            unit: quote.unit.as_str().to_string(),
            quantity: quote.quantity,
            unit_price: format!("{:.2}", quote.unit_price),
            total: format!("{:.2}", quote.total),
        })
    }
}
