//! PostgreSQL implementations of the repository ports.

mod billing_reader;
mod form_repository;
mod payment_method_repository;
mod plan_repository;
mod stats_reader;
mod submission_repository;
mod subscription_store;
mod user_repository;
mod webhook_ledger;

pub use billing_reader::PostgresBillingReader;
pub use form_repository::PostgresFormRepository;
pub use payment_method_repository::PostgresPaymentMethodRepository;
pub use plan_repository::PostgresPlanRepository;
pub use stats_reader::PostgresStatsReader;
pub use submission_repository::PostgresSubmissionRepository;
pub use subscription_store::PostgresSubscriptionStore;
pub use user_repository::PostgresUserRepository;
pub use webhook_ledger::PostgresWebhookLedger;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Build the connection pool from configuration.
pub async fn new_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
}
