//! Subscription lifecycle, plan catalog, and gateway webhook endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::SubscriptionHandlers;
pub use routes::subscription_routes;
