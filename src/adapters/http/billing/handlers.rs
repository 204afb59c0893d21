//! HTTP handlers for payment and payment method endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::forms::dto::PageQuery;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::BillingService;
use crate::domain::billing::NewPaymentMethod;

use super::dto::AddPaymentMethodRequest;

#[derive(Clone)]
pub struct BillingHandlers {
    pub billing: BillingService,
}

/// GET /api/payments
pub async fn list_payments(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = handlers.billing.payments(user.id, query.into()).await?;
    Ok(Json(page))
}

/// GET /api/payments/:payment_id
pub async fn get_payment(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = handlers.billing.payment_detail(user.id, payment_id).await?;
    Ok(Json(payment))
}

/// GET /api/payment-methods
pub async fn list_payment_methods(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let methods = handlers.billing.list_payment_methods(user.id).await?;
    Ok(Json(methods))
}

/// POST /api/payment-methods
pub async fn add_payment_method(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddPaymentMethodRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let method = handlers
        .billing
        .add_payment_method(NewPaymentMethod {
            user_id: user.id,
            provider: req.provider,
            gateway_method_id: req.gateway_method_id,
            last_four: req.last_four,
            card_type: req.card_type,
            expiry_month: req.expiry_month,
            expiry_year: req.expiry_year,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(method)))
}

/// PUT /api/payment-methods/:method_id/default
pub async fn set_default_payment_method(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(method_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    handlers
        .billing
        .set_default_payment_method(user.id, method_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/payment-methods/:method_id
pub async fn delete_payment_method(
    State(handlers): State<BillingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(method_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    handlers
        .billing
        .delete_payment_method(user.id, method_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
