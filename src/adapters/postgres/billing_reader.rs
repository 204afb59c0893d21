//! PostgreSQL implementation of BillingReader.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{HistoryEntry, Payment};
use crate::domain::foundation::DomainError;
use crate::domain::subscription::{BillingInterval, HistoryStatus, PaymentStatus};
use crate::ports::{BillingReader, Page};

pub struct PostgresBillingReader {
    pool: PgPool,
}

impl PostgresBillingReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    user_id: Uuid,
    plan_id: Option<Uuid>,
    plan_name: Option<String>,
    gateway_subscription_id: Option<String>,
    gateway_payment_id: Option<String>,
    status: String,
    billing_cycle: Option<String>,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for HistoryEntry {
    type Error = DomainError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(HistoryEntry {
            id: row.id,
            user_id: row.user_id,
            plan_id: row.plan_id,
            plan_name: row.plan_name,
            gateway_subscription_id: row.gateway_subscription_id,
            gateway_payment_id: row.gateway_payment_id,
            status: HistoryStatus::parse(&row.status)?,
            billing_cycle: row
                .billing_cycle
                .as_deref()
                .map(BillingInterval::parse)
                .transpose()?,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Uuid,
    amount: i64,
    currency: String,
    payment_method: String,
    gateway_payment_id: String,
    gateway_subscription_id: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            currency: row.currency,
            payment_method: row.payment_method,
            gateway_payment_id: row.gateway_payment_id,
            gateway_subscription_id: row.gateway_subscription_id,
            status: PaymentStatus::parse(&row.status)?,
            created_at: row.created_at,
        })
    }
}

const PAYMENT_COLUMNS: &str = "id, user_id, amount, currency, payment_method, \
     gateway_payment_id, gateway_subscription_id, status, created_at";

#[async_trait]
impl BillingReader for PostgresBillingReader {
    async fn history_for_user(&self, user_id: Uuid) -> Result<Vec<HistoryEntry>, DomainError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT h.id, h.user_id, h.plan_id, p.name AS plan_name,
                   h.gateway_subscription_id, h.gateway_payment_id, h.status,
                   h.billing_cycle, h.start_date, h.end_date, h.created_at
            FROM subscription_history h
            LEFT JOIN subscription_plans p ON p.id = h.plan_id
            WHERE h.user_id = $1
            ORDER BY h.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HistoryEntry::try_from).collect()
    }

    async fn payments_for_user(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> Result<(Vec<Payment>, i64), DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        ))
        .bind(user_id)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let payments = rows
            .into_iter()
            .map(Payment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((payments, total))
    }

    async fn payment_for_user(
        &self,
        user_id: Uuid,
        payment_id: Uuid,
    ) -> Result<Option<Payment>, DomainError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1 AND user_id = $2",
        ))
        .bind(payment_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Payment::try_from).transpose()
    }
}
