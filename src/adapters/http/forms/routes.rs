//! Routes for form, intake, and dashboard endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{
    create_form, dashboard, delete_form, delete_submission, delete_submissions,
    export_submissions, get_form, get_submission, list_forms, list_submissions, submit,
    update_form, usage, FormHandlers,
};

/// Router mounted at /api/forms.
pub fn form_routes(handlers: FormHandlers) -> Router {
    Router::new()
        .route("/", post(create_form))
        .route("/", get(list_forms))
        .route("/:form_id", get(get_form))
        .route("/:form_id", put(update_form))
        .route("/:form_id", delete(delete_form))
        .route("/:form_id/submissions", get(list_submissions))
        .route("/:form_id/submissions/export", get(export_submissions))
        .route("/:form_id/submissions/delete", post(delete_submissions))
        .route(
            "/:form_id/submissions/:submission_id",
            get(get_submission).delete(delete_submission),
        )
        .with_state(handlers)
}

/// Router mounted at /f - the public submission endpoint.
pub fn intake_routes(handlers: FormHandlers) -> Router {
    Router::new()
        .route("/:endpoint_id", post(submit))
        .with_state(handlers)
}

/// Router mounted at /api/stats.
pub fn stats_routes(handlers: FormHandlers) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/usage", get(usage))
        .with_state(handlers)
}
