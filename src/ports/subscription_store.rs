//! Subscription state store port.
//!
//! Every method that touches more than one table is transactional in the
//! adapter; the lifecycle engine relies on all-or-nothing application.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::billing::{NewHistoryEntry, NewPayment};
use crate::domain::foundation::DomainError;
use crate::domain::subscription::{BillingInterval, SubscriptionStatus};
use crate::domain::users::User;

/// Everything written when a verified payment activates a subscription:
/// user tier/status/dates, an `active` history row, and a `completed`
/// payment row, in one transaction.
#[derive(Debug, Clone)]
pub struct ActivationRecord {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub tier: String,
    pub gateway_subscription_id: Option<String>,
    pub interval: BillingInterval,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment: NewPayment,
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Mark a plan selection awaiting payment.
    async fn set_pending(&self, user_id: Uuid, plan_id: Uuid) -> Result<(), DomainError>;

    /// Apply a verified payment atomically.
    async fn activate(&self, record: &ActivationRecord) -> Result<(), DomainError>;

    /// Flip a user to active with the given tier, without payment effects
    /// (driven by the gateway's activation webhook).
    async fn mark_active(
        &self,
        user_id: Uuid,
        tier: &str,
        plan_id: Uuid,
        gateway_subscription_id: &str,
    ) -> Result<(), DomainError>;

    /// Set the subscription status, optionally appending a history row in
    /// the same transaction.
    async fn transition(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
        history: Option<&NewHistoryEntry>,
    ) -> Result<(), DomainError>;

    /// Reset a user to the free tier, clearing subscription fields and
    /// appending the history row in one transaction.
    async fn downgrade(&self, user_id: Uuid, history: &NewHistoryEntry)
        -> Result<(), DomainError>;

    /// Record a renewal charge: payment row plus the new end date, in one
    /// transaction.
    async fn record_charge(
        &self,
        user_id: Uuid,
        payment: &NewPayment,
        new_end_date: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Record a standalone payment row (e.g. a failed charge).
    async fn insert_payment(&self, payment: &NewPayment) -> Result<(), DomainError>;

    /// Resolve the user owning a gateway subscription id.
    async fn find_user_by_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<User>, DomainError>;
}
