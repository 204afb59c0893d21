//! Form management, public submission intake, and dashboard endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::FormHandlers;
pub use routes::{form_routes, intake_routes, stats_routes};
