//! Payment gateway configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway configuration (Razorpay)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Public key id, returned to clients for checkout
    pub key_id: String,

    /// Private key secret; also signs payment verification digests
    pub key_secret: String,

    /// Webhook signing secret
    pub webhook_secret: String,

    /// Settlement currency for orders
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PaymentConfig {
    /// Check if using gateway test mode
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_id.is_empty() {
            return Err(ValidationError::MissingGatewayKey);
        }
        if self.key_secret.is_empty() {
            return Err(ValidationError::MissingGatewaySecret);
        }
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingWebhookSecret);
        }
        Ok(())
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> PaymentConfig {
        PaymentConfig {
            key_id: "rzp_test_abc123".to_string(),
            key_secret: "secret123".to_string(),
            webhook_secret: "whsec123".to_string(),
            currency: default_currency(),
        }
    }

    #[test]
    fn test_is_test_mode() {
        assert!(valid_config().is_test_mode());

        let live = PaymentConfig {
            key_id: "rzp_live_abc123".to_string(),
            ..valid_config()
        };
        assert!(!live.is_test_mode());
    }

    #[test]
    fn test_validation_missing_key_id() {
        let config = PaymentConfig {
            key_id: String::new(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_key_secret() {
        let config = PaymentConfig {
            key_secret: String::new(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_webhook_secret() {
        let config = PaymentConfig {
            webhook_secret: String::new(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }
}
