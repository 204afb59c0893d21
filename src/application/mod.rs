//! Application services: use cases composed over the ports.

pub mod auth_service;
pub mod billing_service;
pub mod form_service;
pub mod subscription_service;

pub use auth_service::{AuthService, AuthenticatedProfile, Profile};
pub use billing_service::BillingService;
pub use form_service::{FormDetail, FormInput, FormService, IntakeOutcome, UsageReport};
pub use subscription_service::{
    CheckoutOrder, SubscriptionService, SubscriptionView, WebhookOutcome,
};

use serde::Serialize;

use crate::ports::Page;

/// A page of results with pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
        Self {
            items,
            total,
            page: page.page,
            limit: page.limit,
            pages: page.pages_for(total),
        }
    }
}
