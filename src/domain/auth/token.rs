//! Bearer token issue and verification (JWT HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode};

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Issues and verifies access tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: SecretString,
    expiry: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, expiry_days: u64) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            expiry: Duration::days(expiry_days as i64),
        }
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| {
            DomainError::new(ErrorCode::InternalError, "Token signing failed")
                .with_detail("source", e.to_string())
        })
    }

    /// Verify a token and return its claims. Expired, malformed, and
    /// wrongly-signed tokens all map to `Unauthenticated`.
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| DomainError::new(ErrorCode::Unauthenticated, "Invalid or expired token"))
    }
}
