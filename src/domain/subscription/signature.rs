//! HMAC-SHA256 signature verification for gateway callbacks.
//!
//! The gateway signs two things: the checkout callback (hex digest over
//! `order_id|payment_id` with the key secret) and webhook deliveries (hex
//! digest over the exact raw body bytes with the webhook secret). Both are
//! compared in constant time.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{DomainError, ErrorCode};

type HmacSha256 = Hmac<Sha256>;

/// Verifies gateway-produced signatures.
#[derive(Clone)]
pub struct GatewaySignatures {
    key_secret: SecretString,
    webhook_secret: SecretString,
}

impl GatewaySignatures {
    pub fn new(key_secret: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            key_secret: SecretString::new(key_secret.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
        }
    }

    /// Verify the checkout callback signature over `order_id|payment_id`.
    pub fn verify_payment(
        &self,
        order_id: &str,
        payment_id: &str,
        supplied_hex: &str,
    ) -> Result<(), DomainError> {
        let payload = format!("{}|{}", order_id, payment_id);
        verify_hex_digest(
            self.key_secret.expose_secret().as_bytes(),
            payload.as_bytes(),
            supplied_hex,
        )
    }

    /// Verify a webhook delivery signature over the exact raw body bytes.
    pub fn verify_webhook(&self, raw_body: &[u8], supplied_hex: &str) -> Result<(), DomainError> {
        verify_hex_digest(
            self.webhook_secret.expose_secret().as_bytes(),
            raw_body,
            supplied_hex,
        )
    }

    /// Produce the expected checkout signature. Used by the in-memory
    /// gateway and by tests to forge valid callbacks.
    pub fn sign_payment(&self, order_id: &str, payment_id: &str) -> String {
        let payload = format!("{}|{}", order_id, payment_id);
        hex_digest(self.key_secret.expose_secret().as_bytes(), payload.as_bytes())
    }

    /// Produce the expected webhook signature for a body.
    pub fn sign_webhook(&self, raw_body: &[u8]) -> String {
        hex_digest(self.webhook_secret.expose_secret().as_bytes(), raw_body)
    }
}

fn hex_digest(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret)
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

fn verify_hex_digest(secret: &[u8], payload: &[u8], supplied_hex: &str) -> Result<(), DomainError> {
    let mismatch = || DomainError::new(ErrorCode::SignatureMismatch, "Signature mismatch");

    let supplied = hex::decode(supplied_hex).map_err(|_| mismatch())?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    if expected.ct_eq(supplied.as_slice()).into() {
        Ok(())
    } else {
        Err(mismatch())
    }
}
