//! Routes for billing endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    add_payment_method, delete_payment_method, get_payment, list_payment_methods, list_payments,
    set_default_payment_method, BillingHandlers,
};

/// Router mounted at /api/payments.
pub fn payment_routes(handlers: BillingHandlers) -> Router {
    Router::new()
        .route("/", get(list_payments))
        .route("/:payment_id", get(get_payment))
        .with_state(handlers)
}

/// Router mounted at /api/payment-methods.
pub fn payment_method_routes(handlers: BillingHandlers) -> Router {
    Router::new()
        .route("/", get(list_payment_methods))
        .route("/", post(add_payment_method))
        .route("/:method_id/default", put(set_default_payment_method))
        .route("/:method_id", delete(delete_payment_method))
        .with_state(handlers)
}
