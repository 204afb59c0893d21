//! Request and response shapes for subscription endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::WebhookOutcome;
use crate::domain::subscription::BillingInterval;

#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    pub plan_id: Uuid,
    pub interval: BillingInterval,
}

/// Checkout callback fields, named as the gateway's checkout posts them.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<WebhookOutcome> for WebhookResponse {
    fn from(outcome: WebhookOutcome) -> Self {
        match outcome {
            WebhookOutcome::Processed => WebhookResponse {
                status: "processed",
                reason: None,
            },
            WebhookOutcome::AlreadyProcessed => WebhookResponse {
                status: "already_processed",
                reason: None,
            },
            WebhookOutcome::Ignored(reason) => WebhookResponse {
                status: "ignored",
                reason: Some(reason),
            },
        }
    }
}
