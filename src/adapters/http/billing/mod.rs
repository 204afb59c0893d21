//! Payment history and saved payment method endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::BillingHandlers;
pub use routes::{payment_method_routes, payment_routes};
