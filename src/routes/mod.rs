pub mod booking_routes;
pub mod rental_routes;
