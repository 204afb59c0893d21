//! Subscription plan catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::DomainError;

use super::status::BillingInterval;

/// Tier name applied to users with no paid subscription.
pub const FREE_TIER: &str = "free";

/// A purchasable usage tier. Prices are in major currency units; the gateway
/// order amount is derived in minor units (x100).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub monthly_price: i64,
    pub yearly_price: i64,
    pub form_limit: i32,
    pub submission_limit_monthly: i32,
    pub custom_redirect: bool,
    pub file_uploads: bool,
    pub priority_support: bool,
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Price for one period of the given interval, in major units.
    pub fn price_for(&self, interval: BillingInterval) -> i64 {
        match interval {
            BillingInterval::Monthly => self.monthly_price,
            BillingInterval::Yearly => self.yearly_price,
        }
    }

    /// Gateway order amount for one period, in minor currency units.
    pub fn order_amount_minor(&self, interval: BillingInterval) -> i64 {
        self.price_for(interval) * 100
    }

    /// Infer the billing interval from a gateway order amount, when order
    /// metadata has been lost. Falls back to monthly.
    pub fn interval_for_amount_minor(&self, amount_minor: i64) -> BillingInterval {
        if amount_minor == self.order_amount_minor(BillingInterval::Yearly) {
            BillingInterval::Yearly
        } else {
            BillingInterval::Monthly
        }
    }
}

/// Fields for creating a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub monthly_price: i64,
    pub yearly_price: i64,
    #[serde(default = "default_form_limit")]
    pub form_limit: i32,
    #[serde(default = "default_submission_limit")]
    pub submission_limit_monthly: i32,
    #[serde(default)]
    pub custom_redirect: bool,
    #[serde(default)]
    pub file_uploads: bool,
    #[serde(default)]
    pub priority_support: bool,
}

impl NewPlan {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "Plan name is required"));
        }
        if self.monthly_price < 0 || self.yearly_price < 0 {
            return Err(DomainError::validation(
                "price",
                "Plan prices cannot be negative",
            ));
        }
        Ok(())
    }
}

fn default_form_limit() -> i32 {
    3
}

fn default_submission_limit() -> i32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(monthly: i64, yearly: i64) -> Plan {
        Plan {
            id: Uuid::new_v4(),
            name: "pro".to_string(),
            monthly_price: monthly,
            yearly_price: yearly,
            form_limit: 10,
            submission_limit_monthly: 1000,
            custom_redirect: true,
            file_uploads: false,
            priority_support: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn order_amount_is_minor_units() {
        let p = plan(500, 5000);
        assert_eq!(p.order_amount_minor(BillingInterval::Monthly), 50_000);
        assert_eq!(p.order_amount_minor(BillingInterval::Yearly), 500_000);
    }

    #[test]
    fn interval_inferred_from_amount() {
        let p = plan(500, 5000);
        assert_eq!(
            p.interval_for_amount_minor(500_000),
            BillingInterval::Yearly
        );
        assert_eq!(
            p.interval_for_amount_minor(50_000),
            BillingInterval::Monthly
        );
        // Unrecognized amounts default to monthly
        assert_eq!(p.interval_for_amount_minor(123), BillingInterval::Monthly);
    }

    #[test]
    fn new_plan_rejects_blank_name() {
        let new = NewPlan {
            name: "  ".to_string(),
            monthly_price: 100,
            yearly_price: 1000,
            form_limit: 3,
            submission_limit_monthly: 100,
            custom_redirect: false,
            file_uploads: false,
            priority_support: false,
        };
        assert!(new.validate().is_err());
    }

    #[test]
    fn new_plan_rejects_negative_price() {
        let new = NewPlan {
            name: "pro".to_string(),
            monthly_price: -1,
            yearly_price: 1000,
            form_limit: 3,
            submission_limit_monthly: 100,
            custom_redirect: false,
            file_uploads: false,
            priority_support: false,
        };
        assert!(new.validate().is_err());
    }
}
