//! Routes for auth endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{login, me, register, AuthHandlers};

/// Router mounted at /api/auth.
pub fn auth_routes(handlers: AuthHandlers) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(handlers)
}

/// Router mounted at /api/users.
pub fn user_routes(handlers: AuthHandlers) -> Router {
    Router::new().route("/me", get(me)).with_state(handlers)
}
