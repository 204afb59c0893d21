//! Registration, login, and profile endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AuthHandlers;
pub use routes::{auth_routes, user_routes};
