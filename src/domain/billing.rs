//! Billing records: payments, payment methods, subscription history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::subscription::{BillingInterval, HistoryStatus, PaymentStatus};

/// A recorded payment. Amount is in major currency units.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub payment_method: String,
    pub gateway_payment_id: String,
    pub gateway_subscription_id: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub payment_method: String,
    pub gateway_payment_id: String,
    pub gateway_subscription_id: Option<String>,
    pub status: PaymentStatus,
}

/// An append-only subscription history row.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub plan_name: Option<String>,
    pub gateway_subscription_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub status: HistoryStatus,
    pub billing_cycle: Option<BillingInterval>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields for appending a history row.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub user_id: Uuid,
    pub plan_id: Option<Uuid>,
    pub gateway_subscription_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub status: HistoryStatus,
    pub billing_cycle: Option<BillingInterval>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// A saved payment method. Only display-safe fields are stored; the
/// gateway holds the actual instrument.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub gateway_method_id: String,
    pub last_four: Option<String>,
    pub card_type: Option<String>,
    pub expiry_month: Option<i16>,
    pub expiry_year: Option<i16>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for saving a payment method.
#[derive(Debug, Clone)]
pub struct NewPaymentMethod {
    pub user_id: Uuid,
    pub provider: String,
    pub gateway_method_id: String,
    pub last_four: Option<String>,
    pub card_type: Option<String>,
    pub expiry_month: Option<i16>,
    pub expiry_year: Option<i16>,
}
