//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Token expiry must be at least one hour")]
    TokenExpiryTooShort,

    #[error("Password work factor must be at least 10")]
    WorkFactorTooLow,

    #[error("Gateway key id must not be empty")]
    MissingGatewayKey,

    #[error("Gateway key secret must not be empty")]
    MissingGatewaySecret,

    #[error("Gateway webhook secret must not be empty")]
    MissingWebhookSecret,

    #[error("Invalid from email address")]
    InvalidFromEmail,
}
