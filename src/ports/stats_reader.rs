//! Dashboard statistics port.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::foundation::DomainError;

/// Submission count for one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Submission count for one form.
#[derive(Debug, Clone, Serialize)]
pub struct FormCount {
    pub form_id: Uuid,
    pub title: String,
    pub count: i64,
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_forms: i64,
    pub total_submissions: i64,
    pub submissions_this_month: i64,
    pub submissions_by_day: Vec<DailyCount>,
    pub top_forms: Vec<FormCount>,
}

/// Current-period consumption, compared against plan limits upstream.
#[derive(Debug, Clone, Serialize)]
pub struct UsageStats {
    pub forms_used: i64,
    pub submissions_this_month: i64,
}

#[async_trait]
pub trait StatsReader: Send + Sync {
    /// Dashboard aggregates over the owner's forms. The daily series
    /// covers the last 30 days; top forms are capped at five.
    async fn dashboard(&self, user_id: Uuid) -> Result<DashboardStats, DomainError>;

    async fn usage(&self, user_id: Uuid) -> Result<UsageStats, DomainError>;
}
