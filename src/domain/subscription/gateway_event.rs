//! Typed gateway webhook events.
//!
//! Deliveries arrive as JSON with a string `event` discriminator and nested
//! `payload.{subscription,payment}.entity` objects. Parsing produces a tagged
//! union so the webhook handler can dispatch with an exhaustive match instead
//! of string comparisons scattered through the code.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode};

use super::status::BillingInterval;

/// Checkout metadata attached to gateway orders and subscriptions.
///
/// Written as order `notes` when a plan is selected; read back when a
/// payment is verified or a webhook references the subscription.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotes {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub interval: BillingInterval,
}

/// Subscription entity embedded in a webhook payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEntity {
    pub id: String,
    pub plan_id: Option<String>,
    pub notes: Option<OrderNotes>,
}

/// Payment entity embedded in a webhook payload. Amount is in minor units
/// as delivered by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEntity {
    pub id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub method: Option<String>,
    pub subscription_id: Option<String>,
}

/// A parsed gateway webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    SubscriptionActivated {
        subscription: SubscriptionEntity,
    },
    SubscriptionCharged {
        subscription: SubscriptionEntity,
        payment: PaymentEntity,
    },
    SubscriptionCancelled {
        subscription: SubscriptionEntity,
    },
    SubscriptionHalted {
        subscription: SubscriptionEntity,
    },
    PaymentFailed {
        payment: PaymentEntity,
    },
    /// Event types this service does not handle. Acknowledged and ignored.
    Unknown {
        event: String,
    },
}

impl GatewayEvent {
    /// Parse a raw webhook body. Fails on malformed JSON or a recognized
    /// event type missing its required entity.
    pub fn parse(raw_body: &[u8]) -> Result<Self, DomainError> {
        let raw: RawWebhook = serde_json::from_slice(raw_body).map_err(|e| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Malformed webhook body: {}", e),
            )
        })?;

        let subscription = raw.payload.subscription.map(|w| w.entity.into_domain());
        let payment = raw.payload.payment.map(|w| w.entity.into_domain());

        let event = match raw.event.as_str() {
            "subscription.activated" => GatewayEvent::SubscriptionActivated {
                subscription: require_subscription(subscription, &raw.event)?,
            },
            "subscription.charged" => GatewayEvent::SubscriptionCharged {
                subscription: require_subscription(subscription, &raw.event)?,
                payment: require_payment(payment, &raw.event)?,
            },
            "subscription.cancelled" => GatewayEvent::SubscriptionCancelled {
                subscription: require_subscription(subscription, &raw.event)?,
            },
            "subscription.halted" => GatewayEvent::SubscriptionHalted {
                subscription: require_subscription(subscription, &raw.event)?,
            },
            "payment.failed" => GatewayEvent::PaymentFailed {
                payment: require_payment(payment, &raw.event)?,
            },
            _ => GatewayEvent::Unknown { event: raw.event },
        };

        Ok(event)
    }

    /// Stable name for logging and the dedup ledger.
    pub fn kind(&self) -> &str {
        match self {
            GatewayEvent::SubscriptionActivated { .. } => "subscription.activated",
            GatewayEvent::SubscriptionCharged { .. } => "subscription.charged",
            GatewayEvent::SubscriptionCancelled { .. } => "subscription.cancelled",
            GatewayEvent::SubscriptionHalted { .. } => "subscription.halted",
            GatewayEvent::PaymentFailed { .. } => "payment.failed",
            GatewayEvent::Unknown { event } => event,
        }
    }
}

fn require_subscription(
    entity: Option<SubscriptionEntity>,
    event: &str,
) -> Result<SubscriptionEntity, DomainError> {
    entity.ok_or_else(|| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("Event '{}' is missing its subscription entity", event),
        )
    })
}

fn require_payment(
    entity: Option<PaymentEntity>,
    event: &str,
) -> Result<PaymentEntity, DomainError> {
    entity.ok_or_else(|| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("Event '{}' is missing its payment entity", event),
        )
    })
}

#[derive(Debug, Deserialize)]
struct RawWebhook {
    event: String,
    #[serde(default)]
    payload: RawPayload,
}

#[derive(Debug, Default, Deserialize)]
struct RawPayload {
    subscription: Option<Wrapped<RawSubscription>>,
    payment: Option<Wrapped<RawPayment>>,
}

#[derive(Debug, Deserialize)]
struct Wrapped<T> {
    entity: T,
}

#[derive(Debug, Deserialize)]
struct RawSubscription {
    id: String,
    plan_id: Option<String>,
    #[serde(default)]
    notes: Value,
}

impl RawSubscription {
    fn into_domain(self) -> SubscriptionEntity {
        // Notes are free-form gateway metadata; only well-formed ones parse.
        let notes = serde_json::from_value(self.notes).ok();
        SubscriptionEntity {
            id: self.id,
            plan_id: self.plan_id,
            notes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPayment {
    id: String,
    #[serde(default)]
    amount: i64,
    currency: Option<String>,
    method: Option<String>,
    subscription_id: Option<String>,
}

impl RawPayment {
    fn into_domain(self) -> PaymentEntity {
        PaymentEntity {
            id: self.id,
            amount_minor: self.amount,
            currency: self.currency.unwrap_or_else(|| "INR".to_string()),
            method: self.method,
            subscription_id: self.subscription_id,
        }
    }
}
