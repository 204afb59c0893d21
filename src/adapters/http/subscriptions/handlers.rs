//! HTTP handlers for subscription and plan endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::{BillingService, SubscriptionService};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::NewPlan;

use super::dto::{SelectPlanRequest, VerifyPaymentRequest, WebhookResponse};

#[derive(Clone)]
pub struct SubscriptionHandlers {
    pub subscriptions: SubscriptionService,
    pub billing: BillingService,
}

/// GET /api/subscriptions/plans
pub async fn list_plans(
    State(handlers): State<SubscriptionHandlers>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = handlers.billing.list_plans().await?;
    Ok(Json(plans))
}

/// GET /api/subscriptions/plans/:plan_id
pub async fn get_plan(
    State(handlers): State<SubscriptionHandlers>,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = handlers.billing.plan_detail(plan_id).await?;
    Ok(Json(plan))
}

/// POST /api/subscriptions/plans
pub async fn create_plan(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(_user): RequireAuth,
    Json(plan): Json<NewPlan>,
) -> Result<impl IntoResponse, ApiError> {
    let created = handlers.billing.create_plan(plan).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/subscriptions/plans/:plan_id
pub async fn update_plan(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(plan_id): Path<Uuid>,
    Json(plan): Json<NewPlan>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = handlers.billing.update_plan(plan_id, plan).await?;
    Ok(Json(updated))
}

/// DELETE /api/subscriptions/plans/:plan_id
pub async fn delete_plan(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(plan_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    handlers.billing.delete_plan(plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/subscriptions
pub async fn current_subscription(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let view = handlers.subscriptions.current(user.id).await?;
    Ok(Json(view))
}

/// POST /api/subscriptions/create
pub async fn select_plan(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SelectPlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = handlers
        .subscriptions
        .select_plan(user.id, req.plan_id, req.interval)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /api/subscriptions/verify
pub async fn verify_payment(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = handlers
        .subscriptions
        .verify_payment(
            user.id,
            &req.razorpay_payment_id,
            &req.razorpay_order_id,
            &req.razorpay_signature,
        )
        .await?;
    Ok(Json(view))
}

/// POST /api/subscriptions/cancel
pub async fn cancel_subscription(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    handlers.subscriptions.cancel(user.id).await?;
    let view = handlers.subscriptions.current(user.id).await?;
    Ok(Json(view))
}

/// POST /api/subscriptions/downgrade
pub async fn downgrade_subscription(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    handlers.subscriptions.downgrade(user.id).await?;
    let view = handlers.subscriptions.current(user.id).await?;
    Ok(Json(view))
}

/// GET /api/subscriptions/history
pub async fn subscription_history(
    State(handlers): State<SubscriptionHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let history = handlers.billing.subscription_history(user.id).await?;
    Ok(Json(history))
}

/// POST /api/subscriptions/webhook - gateway event delivery.
///
/// Unauthenticated; trust comes from the HMAC signature over the raw
/// body. The event id header, when present, drives redelivery dedup.
pub async fn webhook(
    State(handlers): State<SubscriptionHandlers>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("x-razorpay-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            DomainError::new(ErrorCode::SignatureMismatch, "Missing webhook signature")
        })?;
    let event_id = headers
        .get("x-razorpay-event-id")
        .and_then(|v| v.to_str().ok());

    let outcome = handlers
        .subscriptions
        .handle_webhook(&body, signature, event_id)
        .await?;
    Ok(Json(WebhookResponse::from(outcome)))
}
