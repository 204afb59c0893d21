//! PostgreSQL implementation of PlanRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::{NewPlan, Plan};
use crate::ports::PlanRepository;

pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a plan.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    monthly_price: i64,
    yearly_price: i64,
    form_limit: i32,
    submission_limit_monthly: i32,
    custom_redirect: bool,
    file_uploads: bool,
    priority_support: bool,
    created_at: DateTime<Utc>,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        Plan {
            id: row.id,
            name: row.name,
            monthly_price: row.monthly_price,
            yearly_price: row.yearly_price,
            form_limit: row.form_limit,
            submission_limit_monthly: row.submission_limit_monthly,
            custom_redirect: row.custom_redirect,
            file_uploads: row.file_uploads,
            priority_support: row.priority_support,
            created_at: row.created_at,
        }
    }
}

const PLAN_COLUMNS: &str = "id, name, monthly_price, yearly_price, form_limit, \
     submission_limit_monthly, custom_redirect, file_uploads, priority_support, created_at";

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn list(&self) -> Result<Vec<Plan>, DomainError> {
        let rows = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM subscription_plans ORDER BY monthly_price ASC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Plan::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Plan>, DomainError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            "SELECT {PLAN_COLUMNS} FROM subscription_plans WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Plan::from))
    }

    async fn create(&self, plan: &NewPlan) -> Result<Plan, DomainError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            INSERT INTO subscription_plans (
                id, name, monthly_price, yearly_price, form_limit,
                submission_limit_monthly, custom_redirect, file_uploads, priority_support
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PLAN_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(&plan.name)
        .bind(plan.monthly_price)
        .bind(plan.yearly_price)
        .bind(plan.form_limit)
        .bind(plan.submission_limit_monthly)
        .bind(plan.custom_redirect)
        .bind(plan.file_uploads)
        .bind(plan.priority_support)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, plan: &NewPlan) -> Result<Plan, DomainError> {
        let row = sqlx::query_as::<_, PlanRow>(&format!(
            r#"
            UPDATE subscription_plans
            SET name = $2, monthly_price = $3, yearly_price = $4, form_limit = $5,
                submission_limit_monthly = $6, custom_redirect = $7, file_uploads = $8,
                priority_support = $9
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&plan.name)
        .bind(plan.monthly_price)
        .bind(plan.yearly_price)
        .bind(plan.form_limit)
        .bind(plan.submission_limit_monthly)
        .bind(plan.custom_redirect)
        .bind(plan.file_uploads)
        .bind(plan.priority_support)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Plan::from)
            .ok_or_else(|| DomainError::new(ErrorCode::PlanNotFound, "Plan not found"))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        let references: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE plan_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if references > 0 {
            return Err(DomainError::new(
                ErrorCode::PlanInUse,
                "Plan has subscribed users and cannot be deleted",
            )
            .with_detail("subscribers", references.to_string()));
        }

        let result = sqlx::query("DELETE FROM subscription_plans WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::PlanNotFound, "Plan not found"));
        }

        tx.commit().await?;
        Ok(())
    }
}
