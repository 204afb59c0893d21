//! PostgreSQL implementation of SubmissionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::forms::{NewSubmission, Submission};
use crate::domain::foundation::DomainError;
use crate::ports::{Page, SubmissionRepository};

pub struct PostgresSubmissionRepository {
    pool: PgPool,
}

impl PostgresSubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    form_id: Uuid,
    data: Value,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            form_id: row.form_id,
            data: row.data,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            created_at: row.created_at,
        }
    }
}

const SUBMISSION_COLUMNS: &str = "id, form_id, data, ip_address, user_agent, created_at";

#[async_trait]
impl SubmissionRepository for PostgresSubmissionRepository {
    async fn insert(&self, submission: &NewSubmission) -> Result<Submission, DomainError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            r#"
            INSERT INTO submissions (id, form_id, data, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUBMISSION_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(submission.form_id)
        .bind(&submission.data)
        .bind(&submission.ip_address)
        .bind(&submission.user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(
        &self,
        form_id: Uuid,
        page: Page,
    ) -> Result<(Vec<Submission>, i64), DomainError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE form_id = $1")
                .bind(form_id)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE form_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        ))
        .bind(form_id)
        .bind(i64::from(page.limit))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Submission::from).collect(), total))
    }

    async fn list_all(&self, form_id: Uuid) -> Result<Vec<Submission>, DomainError> {
        let rows = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE form_id = $1 \
             ORDER BY created_at ASC",
        ))
        .bind(form_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Submission::from).collect())
    }

    async fn find(
        &self,
        form_id: Uuid,
        submission_id: Uuid,
    ) -> Result<Option<Submission>, DomainError> {
        let row = sqlx::query_as::<_, SubmissionRow>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1 AND form_id = $2",
        ))
        .bind(submission_id)
        .bind(form_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Submission::from))
    }

    async fn delete(&self, form_id: Uuid, submission_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1 AND form_id = $2")
            .bind(submission_id)
            .bind(form_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, form_id: Uuid, ids: &[Uuid]) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM submissions WHERE form_id = $1 AND id = ANY($2)")
            .bind(form_id)
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
