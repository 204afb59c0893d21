//! EasyForms server binary.
//!
//! Loads configuration, wires the Postgres adapters and the Razorpay
//! gateway into the application services, and serves the HTTP API.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use easyforms::adapters::gateway::{RazorpayConfig, RazorpayGateway};
use easyforms::adapters::http::{app_router, AppServices};
use easyforms::adapters::postgres::{
    new_pool, PostgresBillingReader, PostgresFormRepository, PostgresPaymentMethodRepository,
    PostgresPlanRepository, PostgresStatsReader, PostgresSubmissionRepository,
    PostgresSubscriptionStore, PostgresUserRepository, PostgresWebhookLedger,
};
use easyforms::application::{AuthService, BillingService, FormService, SubscriptionService};
use easyforms::config::{AppConfig, ServerConfig};
use easyforms::domain::auth::{PasswordHasher, TokenService};
use easyforms::domain::subscription::GatewaySignatures;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = config.validate() {
        eprintln!("invalid configuration: {err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    if let Err(err) = run(config).await {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.is_production() && config.auth.uses_default_secret() {
        tracing::warn!("running in production with the built-in token secret; set EASYFORMS__AUTH__TOKEN_SECRET");
    }

    let pool = new_pool(&config.database).await?;
    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let plans = Arc::new(PostgresPlanRepository::new(pool.clone()));
    let store = Arc::new(PostgresSubscriptionStore::new(pool.clone()));
    let ledger = Arc::new(PostgresWebhookLedger::new(pool.clone()));
    let forms = Arc::new(PostgresFormRepository::new(pool.clone()));
    let submissions = Arc::new(PostgresSubmissionRepository::new(pool.clone()));
    let stats = Arc::new(PostgresStatsReader::new(pool.clone()));
    let billing_reader = Arc::new(PostgresBillingReader::new(pool.clone()));
    let payment_methods = Arc::new(PostgresPaymentMethodRepository::new(pool));

    let gateway = Arc::new(RazorpayGateway::new(RazorpayConfig::from(&config.payment)));
    let signatures = GatewaySignatures::new(
        config.payment.key_secret.clone(),
        config.payment.webhook_secret.clone(),
    );

    let tokens = TokenService::new(
        config.auth.token_secret.clone(),
        config.auth.token_expiry_days,
    );
    let hasher = PasswordHasher::new(config.auth.bcrypt_cost);

    let services = AppServices {
        auth: AuthService::new(users.clone(), hasher, tokens.clone()),
        forms: FormService::new(
            forms,
            submissions,
            stats,
            users.clone(),
            plans.clone(),
        ),
        subscriptions: SubscriptionService::new(
            users,
            plans.clone(),
            store,
            ledger,
            gateway,
            signatures,
            config.payment.key_id.clone(),
            config.payment.currency.clone(),
        ),
        billing: BillingService::new(plans, billing_reader, payment_methods),
        tokens,
    };

    let app = app_router(services).layer(cors_layer(&config.server));

    let addr = config.server.socket_addr();
    tracing::info!(%addr, environment = ?config.server.environment, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// CORS policy from configuration. With no configured origins the API
/// stays open, which is what the public submission endpoints need in
/// development.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}
