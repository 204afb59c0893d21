//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Fallback token secret used when none is configured. Fine for local
/// development; startup warns loudly if it survives into production.
pub const DEFAULT_TOKEN_SECRET: &str = "easyforms_dev_secret";

/// Authentication configuration (JWT + password hashing)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens
    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    /// Token lifetime in days
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: u64,

    /// bcrypt work factor for credential hashing
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    /// True when the built-in development secret is still in use
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__TOKEN_SECRET"));
        }
        if self.token_expiry_days == 0 {
            return Err(ValidationError::TokenExpiryTooShort);
        }
        if self.bcrypt_cost < 10 {
            return Err(ValidationError::WorkFactorTooLow);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_expiry_days: default_token_expiry_days(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

fn default_token_secret() -> String {
    DEFAULT_TOKEN_SECRET.to_string()
}

fn default_token_expiry_days() -> u64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.token_expiry_days, 7);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn test_custom_secret_not_default() {
        let config = AuthConfig {
            token_secret: "a-real-secret".to_string(),
            ..Default::default()
        };
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn test_validation_rejects_weak_work_factor() {
        let config = AuthConfig {
            bcrypt_cost: 4,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_expiry() {
        let config = AuthConfig {
            token_expiry_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
