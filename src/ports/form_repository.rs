//! Form repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::forms::{FieldSpec, Form, FormField, NewForm};
use crate::domain::foundation::DomainError;

/// Replacement values for a form update. Fields are replaced wholesale in
/// the same transaction as the form row.
#[derive(Debug, Clone)]
pub struct FormUpdate {
    pub title: String,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
    pub spam_protection: bool,
    pub fields: Vec<FieldSpec>,
}

#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Create a form with its fields in one transaction.
    async fn create(&self, form: &NewForm) -> Result<Form, DomainError>;

    async fn list_for_owner(&self, user_id: Uuid) -> Result<Vec<Form>, DomainError>;

    async fn find_for_owner(
        &self,
        form_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Form>, DomainError>;

    async fn find_by_endpoint(&self, endpoint_id: &str) -> Result<Option<Form>, DomainError>;

    /// Fields ordered by position.
    async fn fields(&self, form_id: Uuid) -> Result<Vec<FormField>, DomainError>;

    /// Update the form row and replace all fields in one transaction.
    async fn update(&self, form_id: Uuid, update: &FormUpdate) -> Result<(), DomainError>;

    /// Delete a form, cascading fields and submissions in one transaction.
    async fn delete(&self, form_id: Uuid) -> Result<(), DomainError>;

    async fn count_for_owner(&self, user_id: Uuid) -> Result<i64, DomainError>;
}
