//! Routes for subscription endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    cancel_subscription, create_plan, current_subscription, delete_plan, downgrade_subscription,
    get_plan, list_plans, select_plan, subscription_history, update_plan, verify_payment, webhook,
    SubscriptionHandlers,
};

/// Router mounted at /api/subscriptions.
pub fn subscription_routes(handlers: SubscriptionHandlers) -> Router {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/plans", post(create_plan))
        .route("/plans/:plan_id", get(get_plan))
        .route("/plans/:plan_id", put(update_plan))
        .route("/plans/:plan_id", delete(delete_plan))
        .route("/", get(current_subscription))
        .route("/create", post(select_plan))
        .route("/verify", post(verify_payment))
        .route("/cancel", post(cancel_subscription))
        .route("/downgrade", post(downgrade_subscription))
        .route("/history", get(subscription_history))
        .route("/webhook", post(webhook))
        .with_state(handlers)
}
