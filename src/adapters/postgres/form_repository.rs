//! PostgreSQL implementation of FormRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::forms::{FieldSpec, Form, FormField, NewForm};
use crate::domain::foundation::DomainError;
use crate::ports::{FormRepository, FormUpdate};

pub struct PostgresFormRepository {
    pool: PgPool,
}

impl PostgresFormRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a form.
#[derive(Debug, sqlx::FromRow)]
struct FormRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    endpoint_id: String,
    redirect_url: Option<String>,
    spam_protection: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FormRow> for Form {
    fn from(row: FormRow) -> Self {
        Form {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            endpoint_id: row.endpoint_id,
            redirect_url: row.redirect_url,
            spam_protection: row.spam_protection,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FieldRow {
    id: Uuid,
    form_id: Uuid,
    name: String,
    label: String,
    field_type: String,
    required: bool,
    position: i32,
    options: Option<Value>,
}

impl From<FieldRow> for FormField {
    fn from(row: FieldRow) -> Self {
        FormField {
            id: row.id,
            form_id: row.form_id,
            name: row.name,
            label: row.label,
            field_type: row.field_type,
            required: row.required,
            position: row.position,
            options: row.options,
        }
    }
}

const FORM_COLUMNS: &str = "id, user_id, title, description, endpoint_id, redirect_url, \
     spam_protection, created_at, updated_at";

async fn insert_fields(
    tx: &mut Transaction<'_, Postgres>,
    form_id: Uuid,
    fields: &[FieldSpec],
) -> Result<(), DomainError> {
    for (position, spec) in fields.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO form_fields (id, form_id, name, label, field_type, required, position, options)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(form_id)
        .bind(&spec.name)
        .bind(&spec.label)
        .bind(&spec.field_type)
        .bind(spec.required)
        .bind(position as i32)
        .bind(&spec.options)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl FormRepository for PostgresFormRepository {
    async fn create(&self, form: &NewForm) -> Result<Form, DomainError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, FormRow>(&format!(
            r#"
            INSERT INTO forms (id, user_id, title, description, endpoint_id, redirect_url, spam_protection)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {FORM_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(form.user_id)
        .bind(&form.title)
        .bind(&form.description)
        .bind(&form.endpoint_id)
        .bind(&form.redirect_url)
        .bind(form.spam_protection)
        .fetch_one(&mut *tx)
        .await?;

        insert_fields(&mut tx, row.id, &form.fields).await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn list_for_owner(&self, user_id: Uuid) -> Result<Vec<Form>, DomainError> {
        let rows = sqlx::query_as::<_, FormRow>(&format!(
            "SELECT {FORM_COLUMNS} FROM forms WHERE user_id = $1 ORDER BY created_at DESC",
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Form::from).collect())
    }

    async fn find_for_owner(
        &self,
        form_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Form>, DomainError> {
        let row = sqlx::query_as::<_, FormRow>(&format!(
            "SELECT {FORM_COLUMNS} FROM forms WHERE id = $1 AND user_id = $2",
        ))
        .bind(form_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Form::from))
    }

    async fn find_by_endpoint(&self, endpoint_id: &str) -> Result<Option<Form>, DomainError> {
        let row = sqlx::query_as::<_, FormRow>(&format!(
            "SELECT {FORM_COLUMNS} FROM forms WHERE endpoint_id = $1",
        ))
        .bind(endpoint_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Form::from))
    }

    async fn fields(&self, form_id: Uuid) -> Result<Vec<FormField>, DomainError> {
        let rows = sqlx::query_as::<_, FieldRow>(
            "SELECT id, form_id, name, label, field_type, required, position, options \
             FROM form_fields WHERE form_id = $1 ORDER BY position ASC",
        )
        .bind(form_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FormField::from).collect())
    }

    async fn update(&self, form_id: Uuid, update: &FormUpdate) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE forms
            SET title = $2, description = $3, redirect_url = $4, spam_protection = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(form_id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.redirect_url)
        .bind(update.spam_protection)
        .execute(&mut *tx)
        .await?;

        // Fields are replaced wholesale, same transaction
        sqlx::query("DELETE FROM form_fields WHERE form_id = $1")
            .bind(form_id)
            .execute(&mut *tx)
            .await?;
        insert_fields(&mut tx, form_id, &update.fields).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, form_id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM submissions WHERE form_id = $1")
            .bind(form_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM form_fields WHERE form_id = $1")
            .bind(form_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(form_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn count_for_owner(&self, user_id: Uuid) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM forms WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
