//! Saved payment method repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::billing::{NewPaymentMethod, PaymentMethod};
use crate::domain::foundation::DomainError;

#[async_trait]
pub trait PaymentMethodRepository: Send + Sync {
    /// Methods for a user, default first, then newest.
    async fn list(&self, user_id: Uuid) -> Result<Vec<PaymentMethod>, DomainError>;

    /// Save a method. The user's first method becomes the default.
    async fn add(&self, method: &NewPaymentMethod) -> Result<PaymentMethod, DomainError>;

    /// Make a method the default, clearing the flag from the others in the
    /// same transaction. `PaymentMethodNotFound` when absent.
    async fn set_default(&self, user_id: Uuid, method_id: Uuid) -> Result<(), DomainError>;

    /// Delete a method. If it was the default, the newest remaining method
    /// is promoted in the same transaction.
    async fn delete(&self, user_id: Uuid, method_id: Uuid) -> Result<(), DomainError>;
}
