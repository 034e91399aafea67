//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: la
//! resolución de precios por unidad y el motor de disponibilidad y
//! reservas. Los servicios no tocan HTTP ni poseen estado persistente.

pub mod booking_service;
pub mod pricing_service;
