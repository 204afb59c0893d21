//! Mapping from domain errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, ErrorCode};

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

/// A `DomainError` on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::DuplicateEmail
        | ErrorCode::PlanInUse
        | ErrorCode::InvalidStateTransition
        | ErrorCode::SignatureMismatch => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidCredentials | ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::UserNotFound
        | ErrorCode::FormNotFound
        | ErrorCode::SubmissionNotFound
        | ErrorCode::PlanNotFound
        | ErrorCode::PaymentNotFound
        | ErrorCode::PaymentMethodNotFound
        | ErrorCode::NoActiveSubscription => StatusCode::NOT_FOUND,
        ErrorCode::GatewayError | ErrorCode::DatabaseError | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.code);

        // Server-side failures are logged in full but returned opaque.
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = %self.0.code, error = %self.0, "request failed");
            ErrorResponse {
                code: self.0.code.to_string(),
                message: "An unexpected error occurred".to_string(),
                details: HashMap::new(),
            }
        } else {
            ErrorResponse {
                code: self.0.code.to_string(),
                message: self.0.message,
                details: self.0.details,
            }
        };

        (status, Json(body)).into_response()
    }
}
