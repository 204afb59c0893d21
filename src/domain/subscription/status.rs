//! Subscription lifecycle states and billing vocabulary.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Lifecycle state of a user's subscription.
///
/// `None -> Pending -> Active -> {Cancelled, Expired, Halted}`. A downgrade
/// resets any state back to `None`. `Active -> Pending` is disallowed; an
/// active subscriber must cancel or downgrade before selecting a new plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    None,
    Pending,
    Active,
    Cancelled,
    Expired,
    Halted,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::None => "none",
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Halted => "halted",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "none" => Ok(SubscriptionStatus::None),
            "pending" => Ok(SubscriptionStatus::Pending),
            "active" => Ok(SubscriptionStatus::Active),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            "expired" => Ok(SubscriptionStatus::Expired),
            "halted" => Ok(SubscriptionStatus::Halted),
            other => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Unknown subscription status: {}", other),
            )),
        }
    }
}

/// Billing cadence for a paid plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Yearly,
}

impl BillingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Monthly => "monthly",
            BillingInterval::Yearly => "yearly",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "monthly" => Ok(BillingInterval::Monthly),
            "yearly" => Ok(BillingInterval::Yearly),
            other => Err(DomainError::validation(
                "interval",
                format!("Unknown billing interval: {}", other),
            )),
        }
    }

    /// One paid period from `from`. Calendar months, not fixed-length days,
    /// so Jan 31 + 1 month clamps to Feb 28/29.
    pub fn period_end(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            BillingInterval::Monthly => Months::new(1),
            BillingInterval::Yearly => Months::new(12),
        };
        from.checked_add_months(months).unwrap_or(from)
    }
}

/// Outcome state of a recorded payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Unknown payment status: {}", other),
            )),
        }
    }
}

/// Status recorded on an append-only subscription history row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Active,
    Cancelled,
    Expired,
    Halted,
    Upgraded,
    Downgraded,
}

impl HistoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Active => "active",
            HistoryStatus::Cancelled => "cancelled",
            HistoryStatus::Expired => "expired",
            HistoryStatus::Halted => "halted",
            HistoryStatus::Upgraded => "upgraded",
            HistoryStatus::Downgraded => "downgraded",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(HistoryStatus::Active),
            "cancelled" => Ok(HistoryStatus::Cancelled),
            "expired" => Ok(HistoryStatus::Expired),
            "halted" => Ok(HistoryStatus::Halted),
            "upgraded" => Ok(HistoryStatus::Upgraded),
            "downgraded" => Ok(HistoryStatus::Downgraded),
            other => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Unknown history status: {}", other),
            )),
        }
    }
}
