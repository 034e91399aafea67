//! Servicio de resolución de precios por unidad
//!
//! Deriva el precio de cualquier unidad solicitada a partir de los
//! precios dispersos del rental (día/semana/mes, cada uno opcional).
//!
//! Reglas de derivación heredadas del negocio y preservadas tal cual:
//! hora se deriva ÚNICAMENTE del precio por día (día / 24) y año se
//! deriva ÚNICAMENTE del precio por mes (mes × 12). Nunca se deriva
//! cruzando otras unidades. Ningún redondeo ocurre aquí; los montos se
//! redondean a 2 decimales solo en la capa de presentación.

use rust_decimal::Decimal;

use crate::models::rental::{Rental, RentalUnit};
use crate::utils::errors::AppError;

/// Orden de preferencia para la unidad por defecto (precios directos)
const DEFAULT_DIRECT_ORDER: [RentalUnit; 3] = [RentalUnit::Day, RentalUnit::Week, RentalUnit::Month];

/// Último recurso para la unidad por defecto (precios derivados)
const DEFAULT_DERIVED_ORDER: [RentalUnit; 2] = [RentalUnit::Hour, RentalUnit::Year];

/// Precios dispersos de origen de un rental
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RentalPrices {
    pub per_day: Option<Decimal>,
    pub per_week: Option<Decimal>,
    pub per_month: Option<Decimal>,
}

impl RentalPrices {
    pub fn new(
        per_day: Option<Decimal>,
        per_week: Option<Decimal>,
        per_month: Option<Decimal>,
    ) -> Self {
        Self {
            per_day,
            per_week,
            per_month,
        }
    }

    pub fn of(rental: &Rental) -> Self {
        Self {
            per_day: rental.price_per_day,
            per_week: rental.price_per_week,
            per_month: rental.price_per_month,
        }
    }

    /// hora = día / 24, solo si hay precio por día
    fn derived_hour(&self) -> Option<Decimal> {
        self.per_day.map(|day| day / Decimal::from(24))
    }

    /// año = mes × 12, solo si hay precio por mes
    fn derived_year(&self) -> Option<Decimal> {
        self.per_month.map(|month| month * Decimal::from(12))
    }
}

/// Resolver el precio de una unidad solicitada explícitamente.
/// Devuelve None si no hay precio directo ni derivable para esa unidad.
pub fn resolve_unit_price(prices: &RentalPrices, unit: RentalUnit) -> Option<Decimal> {
    match unit {
        RentalUnit::Day => prices.per_day,
        RentalUnit::Week => prices.per_week,
        RentalUnit::Month => prices.per_month,
        RentalUnit::Hour => prices.derived_hour(),
        RentalUnit::Year => prices.derived_year(),
    }
}

/// Resolver el precio de una unidad explícita o fallar con NoPriceForUnit.
/// Nunca sustituye silenciosamente otra unidad.
pub fn require_unit_price(prices: &RentalPrices, unit: RentalUnit) -> Result<Decimal, AppError> {
    resolve_unit_price(prices, unit)
        .ok_or_else(|| AppError::NoPriceForUnit(unit.as_str().to_string()))
}

/// Resolver la unidad por defecto cuando el caller no especifica una:
/// preferencia día → semana → mes, y como último recurso las
/// derivaciones hora → año.
pub fn resolve_default_price(prices: &RentalPrices) -> Option<(RentalUnit, Decimal)> {
    for unit in DEFAULT_DIRECT_ORDER {
        if let Some(price) = resolve_unit_price(prices, unit) {
            return Some((unit, price));
        }
    }
    for unit in DEFAULT_DERIVED_ORDER {
        if let Some(price) = resolve_unit_price(prices, unit) {
            return Some((unit, price));
        }
    }
    None
}

/// Mapa efímero unidad → precio, calculado bajo demanda para la vista
/// de detalle. No se persiste.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPriceMap {
    entries: Vec<(RentalUnit, Decimal)>,
}

impl UnitPriceMap {
    pub fn from_prices(prices: &RentalPrices) -> Self {
        let order = [
            RentalUnit::Day,
            RentalUnit::Week,
            RentalUnit::Month,
            RentalUnit::Hour,
            RentalUnit::Year,
        ];
        let entries = order
            .into_iter()
            .filter_map(|unit| resolve_unit_price(prices, unit).map(|price| (unit, price)))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[(RentalUnit, Decimal)] {
        &self.entries
    }

    pub fn get(&self, unit: RentalUnit) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(u, _)| *u == unit)
            .map(|(_, price)| *price)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_hour_derives_only_from_day() {
        let day_only = RentalPrices::new(Some(dec("90")), None, None);
        assert_eq!(
            resolve_unit_price(&day_only, RentalUnit::Hour),
            Some(dec("90") / Decimal::from(24))
        );

        // sin precio por día no hay hora, aunque existan semana y mes
        let week_and_month = RentalPrices::new(None, Some(dec("550")), Some(dec("2000")));
        assert_eq!(resolve_unit_price(&week_and_month, RentalUnit::Hour), None);
    }

    #[test]
    fn test_year_derives_only_from_month() {
        let month_only = RentalPrices::new(None, None, Some(dec("2000")));
        assert_eq!(
            resolve_unit_price(&month_only, RentalUnit::Year),
            Some(dec("24000"))
        );

        let day_and_week = RentalPrices::new(Some(dec("90")), Some(dec("550")), None);
        assert_eq!(resolve_unit_price(&day_and_week, RentalUnit::Year), None);
    }

    #[test]
    fn test_explicit_missing_unit_fails() {
        let day_only = RentalPrices::new(Some(dec("90")), None, None);
        assert!(matches!(
            require_unit_price(&day_only, RentalUnit::Week),
            Err(AppError::NoPriceForUnit(unit)) if unit == "week"
        ));
    }

    #[test]
    fn test_hour_price_is_exact_no_premature_rounding() {
        let day_only = RentalPrices::new(Some(dec("90")), None, None);
        let hour = require_unit_price(&day_only, RentalUnit::Hour).unwrap();
        assert_eq!(hour, dec("3.75"));
        // multiplicar de vuelta no acumula error de redondeo
        assert_eq!(hour * Decimal::from(24), dec("90"));
    }

    #[test]
    fn test_default_prefers_day_then_week_then_month() {
        let all = RentalPrices::new(Some(dec("90")), Some(dec("550")), Some(dec("2000")));
        assert_eq!(resolve_default_price(&all), Some((RentalUnit::Day, dec("90"))));

        let week_and_month = RentalPrices::new(None, Some(dec("550")), Some(dec("2000")));
        assert_eq!(
            resolve_default_price(&week_and_month),
            Some((RentalUnit::Week, dec("550")))
        );

        let month_only = RentalPrices::new(None, None, Some(dec("2000")));
        assert_eq!(
            resolve_default_price(&month_only),
            Some((RentalUnit::Month, dec("2000")))
        );
    }

    #[test]
    fn test_default_falls_back_to_derivations_last() {
        // sin día/semana/mes directos no queda nada que derivar:
        // hora necesita día y año necesita mes
        let empty = RentalPrices::default();
        assert_eq!(resolve_default_price(&empty), None);
    }

    #[test]
    fn test_no_prices_at_all_fails_every_unit() {
        let empty = RentalPrices::default();
        for unit in [
            RentalUnit::Hour,
            RentalUnit::Day,
            RentalUnit::Week,
            RentalUnit::Month,
            RentalUnit::Year,
        ] {
            assert!(require_unit_price(&empty, unit).is_err());
        }
        assert!(UnitPriceMap::from_prices(&empty).is_empty());
    }

    #[test]
    fn test_unit_price_map_contains_derived_entries() {
        let prices = RentalPrices::new(Some(dec("90")), None, Some(dec("2000")));
        let map = UnitPriceMap::from_prices(&prices);
        assert_eq!(map.get(RentalUnit::Day), Some(dec("90")));
        assert_eq!(map.get(RentalUnit::Hour), Some(dec("3.75")));
        assert_eq!(map.get(RentalUnit::Month), Some(dec("2000")));
        assert_eq!(map.get(RentalUnit::Year), Some(dec("24000")));
        assert_eq!(map.get(RentalUnit::Week), None);
    }
}
