//! Razorpay payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait over Razorpay's REST API using
//! basic auth with the key id and secret. Webhook and payment signature
//! verification live in the domain layer; this client only talks to the
//! orders and subscriptions endpoints.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::config::PaymentConfig;
use crate::domain::subscription::OrderNotes;
use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    key_id: String,
    key_secret: SecretString,
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretString::new(key_secret.into()),
            api_base_url: "https://api.razorpay.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl From<&PaymentConfig> for RazorpayConfig {
    fn from(config: &PaymentConfig) -> Self {
        Self::new(config.key_id.clone(), config.key_secret.clone())
    }
}

pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

/// Order shape returned by the Razorpay API. Notes come back as an
/// object when set and an empty array when not, so they are decoded
/// leniently from raw JSON.
#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
    amount: i64,
    currency: String,
    status: String,
    #[serde(default)]
    notes: serde_json::Value,
}

impl From<RazorpayOrder> for GatewayOrder {
    fn from(order: RazorpayOrder) -> Self {
        let notes = serde_json::from_value::<OrderNotes>(order.notes).ok();
        GatewayOrder {
            id: order.id,
            amount_minor: order.amount,
            currency: order.currency,
            status: order.status,
            notes,
        }
    }
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(
                response.text().await.unwrap_or_default(),
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), error = %message, "Razorpay API error");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, req: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);

        let body = json!({
            "amount": req.amount_minor,
            "currency": req.currency,
            "receipt": req.receipt,
            "notes": req.notes,
        });

        let response = self
            .http_client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let response = self.check_status(response).await?;
        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(order.into())
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders/{}", self.config.api_base_url, order_id);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let response = self.check_status(response).await?;
        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(order.into())
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), GatewayError> {
        let url = format!(
            "{}/v1/subscriptions/{}/cancel",
            self.config.api_base_url, subscription_id
        );

        let response = self
            .http_client
            .post(&url)
            .basic_auth(
                &self.config.key_id,
                Some(self.config.key_secret.expose_secret()),
            )
            .json(&json!({ "cancel_at_cycle_end": 0 }))
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        self.check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn config_defaults_to_live_api() {
        let config = RazorpayConfig::new("rzp_test_abc", "secret");
        assert_eq!(config.api_base_url, "https://api.razorpay.com");
    }

    #[test]
    fn config_with_base_url() {
        let config =
            RazorpayConfig::new("rzp_test_abc", "secret").with_base_url("http://localhost:9090");
        assert_eq!(config.api_base_url, "http://localhost:9090");
    }

    #[test]
    fn order_notes_decode_from_object() {
        let raw = RazorpayOrder {
            id: "order_1".to_string(),
            amount: 50_000,
            currency: "INR".to_string(),
            status: "created".to_string(),
            notes: serde_json::json!({
                "userId": Uuid::new_v4(),
                "planId": Uuid::new_v4(),
                "interval": "monthly",
            }),
        };

        let order = GatewayOrder::from(raw);
        assert!(order.notes.is_some());
    }

    #[test]
    fn order_notes_tolerate_empty_array() {
        // Razorpay serializes absent notes as []
        let raw = RazorpayOrder {
            id: "order_2".to_string(),
            amount: 50_000,
            currency: "INR".to_string(),
            status: "created".to_string(),
            notes: serde_json::json!([]),
        };

        let order = GatewayOrder::from(raw);
        assert!(order.notes.is_none());
    }
}
