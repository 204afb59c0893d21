//! Payment gateway port.
//!
//! The gateway client is an injected collaborator; nothing in the
//! application layer talks to the provider SDK or holds a global client.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::OrderNotes;

/// Errors surfaced by the gateway client.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Network(String),

    #[error("Gateway returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gateway object not found: {0}")]
    NotFound(String),

    #[error("Gateway response could not be decoded: {0}")]
    Decode(String),
}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        DomainError::new(ErrorCode::GatewayError, "Payment gateway request failed")
            .with_detail("source", err.to_string())
    }
}

/// Request to create a checkout order.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    /// Amount in minor currency units
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

/// An order as known by the gateway.
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub notes: Option<OrderNotes>,
}

/// Client for the payment provider's REST API.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, req: CreateOrderRequest) -> Result<GatewayOrder, GatewayError>;

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError>;

    /// Cancel a provider-side subscription. Callers treat failure as
    /// non-fatal and proceed with local state.
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), GatewayError>;
}
