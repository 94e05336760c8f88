//! HTTP handlers.

pub mod availability_handler;
pub mod health_handler;
pub mod reservation_handler;

pub use availability_handler::{availability_routes, calendar_routes};
pub use health_handler::health_routes;
pub use reservation_handler::reservation_routes;
