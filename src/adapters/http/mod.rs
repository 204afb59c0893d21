//! HTTP adapter: routers, handlers, and middleware over axum.

pub mod auth;
pub mod billing;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod subscriptions;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{auth_middleware, AuthenticatedUser, RequireAuth};

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::application::{AuthService, BillingService, FormService, SubscriptionService};
use crate::domain::auth::TokenService;

use auth::{auth_routes, user_routes, AuthHandlers};
use billing::{payment_method_routes, payment_routes, BillingHandlers};
use forms::{form_routes, intake_routes, stats_routes, FormHandlers};
use subscriptions::{subscription_routes, SubscriptionHandlers};

/// Everything the router needs, wired up by the composition root.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub forms: FormService,
    pub subscriptions: SubscriptionService,
    pub billing: BillingService,
    pub tokens: TokenService,
}

/// Build the full application router.
///
/// The auth middleware runs on every route; public routes (intake,
/// webhook, register/login, plan listing) simply never extract the user.
pub fn app_router(services: AppServices) -> Router {
    let auth_handlers = AuthHandlers {
        auth: services.auth,
    };
    let form_handlers = FormHandlers {
        forms: services.forms,
    };
    let subscription_handlers = SubscriptionHandlers {
        subscriptions: services.subscriptions,
        billing: services.billing.clone(),
    };
    let billing_handlers = BillingHandlers {
        billing: services.billing,
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes(auth_handlers.clone()))
        .nest("/api/users", user_routes(auth_handlers))
        .nest("/api/forms", form_routes(form_handlers.clone()))
        .nest("/api/stats", stats_routes(form_handlers.clone()))
        .nest("/f", intake_routes(form_handlers))
        .nest(
            "/api/subscriptions",
            subscription_routes(subscription_handlers),
        )
        .nest("/api/payments", payment_routes(billing_handlers.clone()))
        .nest(
            "/api/payment-methods",
            payment_method_routes(billing_handlers),
        )
        .layer(from_fn_with_state(services.tokens, auth_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
