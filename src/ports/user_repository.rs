//! User repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::DomainError;
use crate::domain::users::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user. A duplicate email maps to `DuplicateEmail`.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Number of users currently referencing a plan.
    async fn count_on_plan(&self, plan_id: Uuid) -> Result<i64, DomainError>;
}
