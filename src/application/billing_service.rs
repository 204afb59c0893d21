//! Plan catalog administration, payment history, and saved payment methods.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::billing::{HistoryEntry, NewPaymentMethod, Payment, PaymentMethod};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::{NewPlan, Plan};
use crate::ports::{BillingReader, Page, PaymentMethodRepository, PlanRepository};

use super::Paginated;

#[derive(Clone)]
pub struct BillingService {
    plans: Arc<dyn PlanRepository>,
    reader: Arc<dyn BillingReader>,
    payment_methods: Arc<dyn PaymentMethodRepository>,
}

impl BillingService {
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        reader: Arc<dyn BillingReader>,
        payment_methods: Arc<dyn PaymentMethodRepository>,
    ) -> Self {
        Self {
            plans,
            reader,
            payment_methods,
        }
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>, DomainError> {
        self.plans.list().await
    }

    pub async fn plan_detail(&self, plan_id: Uuid) -> Result<Plan, DomainError> {
        self.plans
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::PlanNotFound, "Plan not found"))
    }

    pub async fn create_plan(&self, plan: NewPlan) -> Result<Plan, DomainError> {
        plan.validate()?;
        let created = self.plans.create(&plan).await?;
        info!(plan_id = %created.id, name = %created.name, "plan created");
        Ok(created)
    }

    pub async fn update_plan(&self, plan_id: Uuid, plan: NewPlan) -> Result<Plan, DomainError> {
        plan.validate()?;
        self.plans.update(plan_id, &plan).await
    }

    /// Delete a plan. Refused with `PlanInUse` while any user references
    /// it; the row is left untouched.
    pub async fn delete_plan(&self, plan_id: Uuid) -> Result<(), DomainError> {
        self.plans.delete(plan_id).await?;
        info!(%plan_id, "plan deleted");
        Ok(())
    }

    pub async fn subscription_history(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<HistoryEntry>, DomainError> {
        self.reader.history_for_user(user_id).await
    }

    pub async fn payments(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> Result<Paginated<Payment>, DomainError> {
        let (items, total) = self.reader.payments_for_user(user_id, page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn payment_detail(
        &self,
        user_id: Uuid,
        payment_id: Uuid,
    ) -> Result<Payment, DomainError> {
        self.reader
            .payment_for_user(user_id, payment_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::PaymentNotFound, "Payment not found"))
    }

    pub async fn list_payment_methods(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PaymentMethod>, DomainError> {
        self.payment_methods.list(user_id).await
    }

    pub async fn add_payment_method(
        &self,
        method: NewPaymentMethod,
    ) -> Result<PaymentMethod, DomainError> {
        if method.gateway_method_id.trim().is_empty() {
            return Err(DomainError::validation(
                "gateway_method_id",
                "Gateway method id is required",
            ));
        }
        self.payment_methods.add(&method).await
    }

    pub async fn set_default_payment_method(
        &self,
        user_id: Uuid,
        method_id: Uuid,
    ) -> Result<(), DomainError> {
        self.payment_methods.set_default(user_id, method_id).await
    }

    pub async fn delete_payment_method(
        &self,
        user_id: Uuid,
        method_id: Uuid,
    ) -> Result<(), DomainError> {
        self.payment_methods.delete(user_id, method_id).await
    }
}
