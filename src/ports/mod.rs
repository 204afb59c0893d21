//! Ports: trait seams between the application layer and adapters.

pub mod billing_reader;
pub mod form_repository;
pub mod payment_gateway;
pub mod payment_method_repository;
pub mod plan_repository;
pub mod stats_reader;
pub mod submission_repository;
pub mod subscription_store;
pub mod user_repository;
pub mod webhook_ledger;

pub use billing_reader::BillingReader;
pub use form_repository::{FormRepository, FormUpdate};
pub use payment_gateway::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};
pub use payment_method_repository::PaymentMethodRepository;
pub use plan_repository::PlanRepository;
pub use stats_reader::{DailyCount, DashboardStats, FormCount, StatsReader, UsageStats};
pub use submission_repository::SubmissionRepository;
pub use subscription_store::{ActivationRecord, SubscriptionStore};
pub use user_repository::UserRepository;
pub use webhook_ledger::{LedgerOutcome, ProcessedWebhook, SaveResult, WebhookLedger};

/// Pagination request. Pages are 1-based.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// Total page count for a result set of `total` rows.
    pub fn pages_for(&self, total: i64) -> i64 {
        (total + i64::from(self.limit) - 1) / i64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}
