//! HTTP handlers for auth endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{AuthService, Profile};

use super::dto::{LoginRequest, RegisterRequest};

#[derive(Clone)]
pub struct AuthHandlers {
    pub auth: AuthService,
}

/// POST /api/auth/register
pub async fn register(
    State(handlers): State<AuthHandlers>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = handlers
        .auth
        .register(&req.name, &req.email, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /api/auth/login
pub async fn login(
    State(handlers): State<AuthHandlers>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = handlers.auth.login(&req.email, &req.password).await?;
    Ok(Json(profile))
}

/// GET /api/users/me
pub async fn me(
    State(handlers): State<AuthHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let user = handlers.auth.profile(user.id).await?;
    Ok(Json(Profile::from(&user)))
}
