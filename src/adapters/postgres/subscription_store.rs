//! PostgreSQL implementation of SubscriptionStore.
//!
//! All multi-table writes run in a single transaction; the lifecycle
//! engine depends on partial application being impossible.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::billing::{NewHistoryEntry, NewPayment};
use crate::domain::foundation::DomainError;
use crate::domain::subscription::{HistoryStatus, SubscriptionStatus, FREE_TIER};
use crate::domain::users::User;
use crate::ports::{ActivationRecord, SubscriptionStore};

use super::user_repository::{UserRow, USER_COLUMNS};

pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_history(
    tx: &mut Transaction<'_, Postgres>,
    entry: &NewHistoryEntry,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO subscription_history (
            id, user_id, plan_id, gateway_subscription_id, gateway_payment_id,
            status, billing_cycle, start_date, end_date
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(entry.user_id)
    .bind(entry.plan_id)
    .bind(&entry.gateway_subscription_id)
    .bind(&entry.gateway_payment_id)
    .bind(entry.status.as_str())
    .bind(entry.billing_cycle.map(|c| c.as_str()))
    .bind(entry.start_date)
    .bind(entry.end_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_payment_row(
    tx: &mut Transaction<'_, Postgres>,
    payment: &NewPayment,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO payments (
            id, user_id, amount, currency, payment_method,
            gateway_payment_id, gateway_subscription_id, status
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payment.user_id)
    .bind(payment.amount)
    .bind(&payment.currency)
    .bind(&payment.payment_method)
    .bind(&payment.gateway_payment_id)
    .bind(&payment.gateway_subscription_id)
    .bind(payment.status.as_str())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn set_pending(&self, user_id: Uuid, plan_id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE users SET subscription_status = $2, plan_id = $3 WHERE id = $1",
        )
        .bind(user_id)
        .bind(SubscriptionStatus::Pending.as_str())
        .bind(plan_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn activate(&self, record: &ActivationRecord) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users
            SET subscription_tier = $2,
                subscription_status = $3,
                plan_id = $4,
                gateway_subscription_id = $5,
                subscription_start_date = $6,
                subscription_end_date = $7
            WHERE id = $1
            "#,
        )
        .bind(record.user_id)
        .bind(&record.tier)
        .bind(SubscriptionStatus::Active.as_str())
        .bind(record.plan_id)
        .bind(&record.gateway_subscription_id)
        .bind(record.start_date)
        .bind(record.end_date)
        .execute(&mut *tx)
        .await?;

        insert_history(
            &mut tx,
            &NewHistoryEntry {
                user_id: record.user_id,
                plan_id: Some(record.plan_id),
                gateway_subscription_id: record.gateway_subscription_id.clone(),
                gateway_payment_id: Some(record.payment.gateway_payment_id.clone()),
                status: HistoryStatus::Active,
                billing_cycle: Some(record.interval),
                start_date: record.start_date,
                end_date: Some(record.end_date),
            },
        )
        .await?;

        insert_payment_row(&mut tx, &record.payment).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn mark_active(
        &self,
        user_id: Uuid,
        tier: &str,
        plan_id: Uuid,
        gateway_subscription_id: &str,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE users
            SET subscription_tier = $2,
                subscription_status = $3,
                plan_id = $4,
                gateway_subscription_id = $5
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(tier)
        .bind(SubscriptionStatus::Active.as_str())
        .bind(plan_id)
        .bind(gateway_subscription_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn transition(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
        history: Option<&NewHistoryEntry>,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET subscription_status = $2 WHERE id = $1")
            .bind(user_id)
            .bind(status.as_str())
            .execute(&mut *tx)
            .await?;

        if let Some(entry) = history {
            insert_history(&mut tx, entry).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn downgrade(
        &self,
        user_id: Uuid,
        history: &NewHistoryEntry,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users
            SET subscription_tier = $2,
                subscription_status = $3,
                plan_id = NULL,
                gateway_subscription_id = NULL,
                subscription_start_date = NULL,
                subscription_end_date = NULL
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(FREE_TIER)
        .bind(SubscriptionStatus::None.as_str())
        .execute(&mut *tx)
        .await?;

        insert_history(&mut tx, history).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn record_charge(
        &self,
        user_id: Uuid,
        payment: &NewPayment,
        new_end_date: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        insert_payment_row(&mut tx, payment).await?;

        sqlx::query("UPDATE users SET subscription_end_date = $2 WHERE id = $1")
            .bind(user_id)
            .bind(new_end_date)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn insert_payment(&self, payment: &NewPayment) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;
        insert_payment_row(&mut tx, payment).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_user_by_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE gateway_subscription_id = $1",
        ))
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
