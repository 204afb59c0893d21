//! Registration, login, and profile lookup.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::auth::{PasswordHasher, TokenService};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::users::{NewUser, User};
use crate::ports::UserRepository;

/// Public profile shape; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subscription_tier: String,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            subscription_tier: user.subscription_tier.clone(),
        }
    }
}

/// A profile plus a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedProfile {
    pub user: Profile,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedProfile, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name", "Name is required"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("email", "Invalid email address"));
        }
        if password.len() < 8 {
            return Err(DomainError::validation(
                "password",
                "Password must be at least 8 characters",
            ));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .users
            .create(&NewUser {
                name: name.trim().to_string(),
                email: email.to_lowercase(),
                password_hash,
            })
            .await?;

        let token = self.tokens.issue(user.id, &user.email)?;
        info!(user_id = %user.id, "user registered");

        Ok(AuthenticatedProfile {
            user: Profile::from(&user),
            token,
        })
    }

    /// Unknown email and wrong password both return `InvalidCredentials`,
    /// so responses cannot be used to enumerate accounts.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedProfile, DomainError> {
        let invalid =
            || DomainError::new(ErrorCode::InvalidCredentials, "Invalid email or password");

        let user = self
            .users
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(invalid());
        }

        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthenticatedProfile {
            user: Profile::from(&user),
            token,
        })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))
    }
}
