//! Submission repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::forms::{NewSubmission, Submission};
use crate::domain::foundation::DomainError;

use super::Page;

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, DomainError>;

    /// One page of submissions, newest first, with the total count.
    async fn list(&self, form_id: Uuid, page: Page)
        -> Result<(Vec<Submission>, i64), DomainError>;

    /// All submissions for a form, oldest first (export).
    async fn list_all(&self, form_id: Uuid) -> Result<Vec<Submission>, DomainError>;

    async fn find(
        &self,
        form_id: Uuid,
        submission_id: Uuid,
    ) -> Result<Option<Submission>, DomainError>;

    /// Returns false when no row matched.
    async fn delete(&self, form_id: Uuid, submission_id: Uuid) -> Result<bool, DomainError>;

    /// Returns the number of rows deleted.
    async fn delete_many(&self, form_id: Uuid, ids: &[Uuid]) -> Result<u64, DomainError>;
}
