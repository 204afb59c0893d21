//! PostgreSQL implementation of the webhook dedup ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::ports::{LedgerOutcome, ProcessedWebhook, SaveResult, WebhookLedger};

pub struct PostgresWebhookLedger {
    pool: PgPool,
}

impl PostgresWebhookLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    event_id: String,
    event_type: String,
    outcome: String,
    processed_at: DateTime<Utc>,
}

impl TryFrom<LedgerRow> for ProcessedWebhook {
    type Error = DomainError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        Ok(ProcessedWebhook {
            event_id: row.event_id,
            event_type: row.event_type,
            outcome: LedgerOutcome::parse(&row.outcome)?,
            processed_at: row.processed_at,
        })
    }
}

#[async_trait]
impl WebhookLedger for PostgresWebhookLedger {
    async fn find(&self, event_id: &str) -> Result<Option<ProcessedWebhook>, DomainError> {
        let row = sqlx::query_as::<_, LedgerRow>(
            "SELECT event_id, event_type, outcome, processed_at \
             FROM gateway_webhook_events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProcessedWebhook::try_from).transpose()
    }

    async fn save(&self, record: &ProcessedWebhook) -> Result<SaveResult, DomainError> {
        // First insert wins; a concurrent delivery hitting the primary key
        // is reported, not treated as a failure.
        let result = sqlx::query(
            r#"
            INSERT INTO gateway_webhook_events (event_id, event_type, outcome, processed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_id) DO NOTHING
            "#,
        )
        .bind(&record.event_id)
        .bind(&record.event_type)
        .bind(record.outcome.as_str())
        .bind(record.processed_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            Ok(SaveResult::Inserted)
        } else {
            Ok(SaveResult::AlreadyExists)
        }
    }
}
