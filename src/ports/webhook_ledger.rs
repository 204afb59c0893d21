//! Processed-webhook ledger port.
//!
//! Gateway deliveries are at-least-once. The ledger records processed event
//! ids so redelivered events (notably `subscription.charged`) cannot apply
//! their effects twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::{DomainError, ErrorCode};

/// How a recorded event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOutcome {
    Processed,
    Ignored,
    Failed,
}

impl LedgerOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerOutcome::Processed => "processed",
            LedgerOutcome::Ignored => "ignored",
            LedgerOutcome::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "processed" => Ok(LedgerOutcome::Processed),
            "ignored" => Ok(LedgerOutcome::Ignored),
            "failed" => Ok(LedgerOutcome::Failed),
            other => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Unknown ledger outcome: {}", other),
            )),
        }
    }
}

/// A ledger entry for one gateway event id.
#[derive(Debug, Clone)]
pub struct ProcessedWebhook {
    pub event_id: String,
    pub event_type: String,
    pub outcome: LedgerOutcome,
    pub processed_at: DateTime<Utc>,
}

/// Result of saving a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    Inserted,
    /// Another delivery won the insert race; its record stands.
    AlreadyExists,
}

#[async_trait]
pub trait WebhookLedger: Send + Sync {
    async fn find(&self, event_id: &str) -> Result<Option<ProcessedWebhook>, DomainError>;

    /// Insert an entry. Primary-key conflict returns `AlreadyExists`
    /// instead of an error.
    async fn save(&self, record: &ProcessedWebhook) -> Result<SaveResult, DomainError>;
}
