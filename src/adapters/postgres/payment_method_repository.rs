//! PostgreSQL implementation of PaymentMethodRepository.
//!
//! The default flag is maintained transactionally: adding a first method,
//! changing the default, and deleting the default all keep exactly one
//! method flagged while any exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{NewPaymentMethod, PaymentMethod};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PaymentMethodRepository;

pub struct PostgresPaymentMethodRepository {
    pool: PgPool,
}

impl PostgresPaymentMethodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MethodRow {
    id: Uuid,
    user_id: Uuid,
    provider: String,
    gateway_method_id: String,
    last_four: Option<String>,
    card_type: Option<String>,
    expiry_month: Option<i16>,
    expiry_year: Option<i16>,
    is_default: bool,
    created_at: DateTime<Utc>,
}

impl From<MethodRow> for PaymentMethod {
    fn from(row: MethodRow) -> Self {
        PaymentMethod {
            id: row.id,
            user_id: row.user_id,
            provider: row.provider,
            gateway_method_id: row.gateway_method_id,
            last_four: row.last_four,
            card_type: row.card_type,
            expiry_month: row.expiry_month,
            expiry_year: row.expiry_year,
            is_default: row.is_default,
            created_at: row.created_at,
        }
    }
}

const METHOD_COLUMNS: &str = "id, user_id, provider, gateway_method_id, last_four, \
     card_type, expiry_month, expiry_year, is_default, created_at";

fn method_not_found() -> DomainError {
    DomainError::new(ErrorCode::PaymentMethodNotFound, "Payment method not found")
}

#[async_trait]
impl PaymentMethodRepository for PostgresPaymentMethodRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<PaymentMethod>, DomainError> {
        let rows = sqlx::query_as::<_, MethodRow>(&format!(
            "SELECT {METHOD_COLUMNS} FROM payment_methods WHERE user_id = $1 \
             ORDER BY is_default DESC, created_at DESC",
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PaymentMethod::from).collect())
    }

    async fn add(&self, method: &NewPaymentMethod) -> Result<PaymentMethod, DomainError> {
        let mut tx = self.pool.begin().await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payment_methods WHERE user_id = $1")
                .bind(method.user_id)
                .fetch_one(&mut *tx)
                .await?;

        let row = sqlx::query_as::<_, MethodRow>(&format!(
            r#"
            INSERT INTO payment_methods (
                id, user_id, provider, gateway_method_id, last_four,
                card_type, expiry_month, expiry_year, is_default
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {METHOD_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(method.user_id)
        .bind(&method.provider)
        .bind(&method.gateway_method_id)
        .bind(&method.last_four)
        .bind(&method.card_type)
        .bind(method.expiry_month)
        .bind(method.expiry_year)
        .bind(existing == 0)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn set_default(&self, user_id: Uuid, method_id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE payment_methods SET is_default = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(method_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(method_not_found());
        }

        sqlx::query(
            "UPDATE payment_methods SET is_default = FALSE WHERE user_id = $1 AND id <> $2",
        )
        .bind(user_id)
        .bind(method_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, method_id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        let was_default: Option<bool> = sqlx::query_scalar(
            "DELETE FROM payment_methods WHERE id = $1 AND user_id = $2 RETURNING is_default",
        )
        .bind(method_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(was_default) = was_default else {
            return Err(method_not_found());
        };

        if was_default {
            // Promote the newest remaining method, if any
            sqlx::query(
                r#"
                UPDATE payment_methods SET is_default = TRUE
                WHERE id = (
                    SELECT id FROM payment_methods WHERE user_id = $1
                    ORDER BY created_at DESC LIMIT 1
                )
                "#,
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
