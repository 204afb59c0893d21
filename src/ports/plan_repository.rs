//! Subscription plan repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::DomainError;
use crate::domain::subscription::{NewPlan, Plan};

#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// All plans, cheapest monthly price first.
    async fn list(&self) -> Result<Vec<Plan>, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Plan>, DomainError>;

    async fn create(&self, plan: &NewPlan) -> Result<Plan, DomainError>;

    /// Replace a plan's fields. `PlanNotFound` when absent.
    async fn update(&self, id: Uuid, plan: &NewPlan) -> Result<Plan, DomainError>;

    /// Delete a plan. `PlanInUse` while any user references it,
    /// `PlanNotFound` when absent.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
