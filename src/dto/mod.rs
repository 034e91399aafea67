//! DTOs de la API
//!
//! Requests y responses serializables de la capa HTTP. Los montos se
//! formatean a 2 decimales aquí, nunca en los servicios.

pub mod booking_dto;
pub mod rental_dto;
