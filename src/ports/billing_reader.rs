//! Billing read-model port: payment and subscription history queries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::billing::{HistoryEntry, Payment};
use crate::domain::foundation::DomainError;

use super::Page;

#[async_trait]
pub trait BillingReader: Send + Sync {
    /// Subscription history rows, newest first, with plan names joined in.
    async fn history_for_user(&self, user_id: Uuid) -> Result<Vec<HistoryEntry>, DomainError>;

    /// One page of payments, newest first, with the total count.
    async fn payments_for_user(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> Result<(Vec<Payment>, i64), DomainError>;

    async fn payment_for_user(
        &self,
        user_id: Uuid,
        payment_id: Uuid,
    ) -> Result<Option<Payment>, DomainError>;
}
