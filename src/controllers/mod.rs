//! Controllers del sistema
//!
//! Orquestan DTOs, servicios y repositorios. No contienen SQL ni
//! detalles de HTTP; eso vive en repositories y routes respectivamente.

pub mod booking_controller;
pub mod rental_controller;
