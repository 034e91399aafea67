//! Repositorios de acceso a datos
//!
//! Este módulo contiene los repositorios sqlx que encapsulan las
//! consultas a PostgreSQL. Los repositorios no contienen lógica de
//! negocio; la semántica de precios y disponibilidad vive en services.

pub mod booking_repository;
pub mod rental_repository;
