//! User aggregate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::subscription::{SubscriptionStatus, FREE_TIER};

/// An account holder. Subscription state lives directly on the user row;
/// the lifecycle engine is the only writer of those fields.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub subscription_tier: String,
    pub subscription_status: SubscriptionStatus,
    pub plan_id: Option<Uuid>,
    pub gateway_subscription_id: Option<String>,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the paid subscription is live at `now`. Expiry is enforced
    /// reactively here; there is no background sweeper.
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        self.subscription_status == SubscriptionStatus::Active
            && self.subscription_end_date.map_or(true, |end| end > now)
    }

    /// Whether the user is on the free tier with no subscription state.
    pub fn is_free(&self) -> bool {
        self.subscription_tier == FREE_TIER
            && self.subscription_status == SubscriptionStatus::None
            && self.plan_id.is_none()
    }
}

/// Fields for creating a user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
