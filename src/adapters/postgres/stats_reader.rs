//! PostgreSQL implementation of StatsReader: dashboard and usage aggregates.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::DomainError;
use crate::ports::{DailyCount, DashboardStats, FormCount, StatsReader, UsageStats};

pub struct PostgresStatsReader {
    pool: PgPool,
}

impl PostgresStatsReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DailyRow {
    day: NaiveDate,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct FormCountRow {
    form_id: Uuid,
    title: String,
    count: i64,
}

#[async_trait]
impl StatsReader for PostgresStatsReader {
    async fn dashboard(&self, user_id: Uuid) -> Result<DashboardStats, DomainError> {
        let total_forms: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM forms WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let total_submissions: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM submissions s \
             JOIN forms f ON f.id = s.form_id WHERE f.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let submissions_this_month: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM submissions s \
             JOIN forms f ON f.id = s.form_id \
             WHERE f.user_id = $1 AND s.created_at >= date_trunc('month', NOW())",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let daily = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT s.created_at::date AS day, COUNT(*) AS count
            FROM submissions s
            JOIN forms f ON f.id = s.form_id
            WHERE f.user_id = $1 AND s.created_at >= NOW() - INTERVAL '30 days'
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let top = sqlx::query_as::<_, FormCountRow>(
            r#"
            SELECT f.id AS form_id, f.title, COUNT(s.id) AS count
            FROM forms f
            LEFT JOIN submissions s ON s.form_id = f.id
            WHERE f.user_id = $1
            GROUP BY f.id, f.title
            ORDER BY count DESC
            LIMIT 5
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_forms,
            total_submissions,
            submissions_this_month,
            submissions_by_day: daily
                .into_iter()
                .map(|row| DailyCount {
                    day: row.day,
                    count: row.count,
                })
                .collect(),
            top_forms: top
                .into_iter()
                .map(|row| FormCount {
                    form_id: row.form_id,
                    title: row.title,
                    count: row.count,
                })
                .collect(),
        })
    }

    async fn usage(&self, user_id: Uuid) -> Result<UsageStats, DomainError> {
        let forms_used: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM forms WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let submissions_this_month: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM submissions s \
             JOIN forms f ON f.id = s.form_id \
             WHERE f.user_id = $1 AND s.created_at >= date_trunc('month', NOW())",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(UsageStats {
            forms_used,
            submissions_this_month,
        })
    }
}
