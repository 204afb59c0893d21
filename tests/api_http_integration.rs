//! Integration tests for the HTTP layer wiring:
//! 1. Request DTOs deserialize correctly
//! 2. Response DTOs serialize correctly
//! 3. The full application router can be wired together

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use easyforms::adapters::gateway::MockGateway;
use easyforms::adapters::http::auth::dto::{LoginRequest, RegisterRequest};
use easyforms::adapters::http::billing::dto::AddPaymentMethodRequest;
use easyforms::adapters::http::forms::dto::{BulkDeleteRequest, PageQuery};
use easyforms::adapters::http::subscriptions::dto::{
    SelectPlanRequest, VerifyPaymentRequest, WebhookResponse,
};
use easyforms::adapters::http::{app_router, AppServices};
use easyforms::application::{
    AuthService, BillingService, FormInput, FormService, SubscriptionService, WebhookOutcome,
};
use easyforms::domain::auth::{PasswordHasher, TokenService};
use easyforms::domain::billing::{
    HistoryEntry, NewPaymentMethod, Payment, PaymentMethod,
};
use easyforms::domain::forms::{Form, FormField, NewForm, NewSubmission, Submission};
use easyforms::domain::foundation::DomainError;
use easyforms::domain::subscription::{
    BillingInterval, GatewaySignatures, NewPlan, Plan, SubscriptionStatus,
};
use easyforms::domain::users::{NewUser, User};
use easyforms::ports::{
    ActivationRecord, BillingReader, DashboardStats, FormRepository, FormUpdate, Page,
    PaymentMethodRepository, PlanRepository, ProcessedWebhook, SaveResult, StatsReader,
    SubmissionRepository, SubscriptionStore, UsageStats, UserRepository, WebhookLedger,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Stub backend for wiring tests; no route in these tests reaches storage.
struct StubBackend;

#[async_trait]
impl UserRepository for StubBackend {
    async fn create(&self, _user: &NewUser) -> Result<User, DomainError> {
        unimplemented!("not exercised")
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
        Ok(None)
    }

    async fn count_on_plan(&self, _plan_id: Uuid) -> Result<i64, DomainError> {
        Ok(0)
    }
}

#[async_trait]
impl PlanRepository for StubBackend {
    async fn list(&self) -> Result<Vec<Plan>, DomainError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Plan>, DomainError> {
        Ok(None)
    }

    async fn create(&self, _plan: &NewPlan) -> Result<Plan, DomainError> {
        unimplemented!("not exercised")
    }

    async fn update(&self, _id: Uuid, _plan: &NewPlan) -> Result<Plan, DomainError> {
        unimplemented!("not exercised")
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }
}

#[async_trait]
impl SubscriptionStore for StubBackend {
    async fn set_pending(&self, _user_id: Uuid, _plan_id: Uuid) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn activate(&self, _record: &ActivationRecord) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn mark_active(
        &self,
        _user_id: Uuid,
        _tier: &str,
        _plan_id: Uuid,
        _gateway_subscription_id: &str,
    ) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn transition(
        &self,
        _user_id: Uuid,
        _status: SubscriptionStatus,
        _history: Option<&easyforms::domain::billing::NewHistoryEntry>,
    ) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn downgrade(
        &self,
        _user_id: Uuid,
        _history: &easyforms::domain::billing::NewHistoryEntry,
    ) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn record_charge(
        &self,
        _user_id: Uuid,
        _payment: &easyforms::domain::billing::NewPayment,
        _new_end_date: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn insert_payment(
        &self,
        _payment: &easyforms::domain::billing::NewPayment,
    ) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn find_user_by_subscription(
        &self,
        _subscription_id: &str,
    ) -> Result<Option<User>, DomainError> {
        Ok(None)
    }
}

#[async_trait]
impl WebhookLedger for StubBackend {
    async fn find(&self, _event_id: &str) -> Result<Option<ProcessedWebhook>, DomainError> {
        Ok(None)
    }

    async fn save(&self, _record: &ProcessedWebhook) -> Result<SaveResult, DomainError> {
        Ok(SaveResult::Inserted)
    }
}

#[async_trait]
impl FormRepository for StubBackend {
    async fn create(&self, _form: &NewForm) -> Result<Form, DomainError> {
        unimplemented!("not exercised")
    }

    async fn list_for_owner(&self, _user_id: Uuid) -> Result<Vec<Form>, DomainError> {
        Ok(Vec::new())
    }

    async fn find_for_owner(
        &self,
        _form_id: Uuid,
        _user_id: Uuid,
    ) -> Result<Option<Form>, DomainError> {
        Ok(None)
    }

    async fn find_by_endpoint(&self, _endpoint_id: &str) -> Result<Option<Form>, DomainError> {
        Ok(None)
    }

    async fn fields(&self, _form_id: Uuid) -> Result<Vec<FormField>, DomainError> {
        Ok(Vec::new())
    }

    async fn update(&self, _form_id: Uuid, _update: &FormUpdate) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn delete(&self, _form_id: Uuid) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn count_for_owner(&self, _user_id: Uuid) -> Result<i64, DomainError> {
        Ok(0)
    }
}

#[async_trait]
impl SubmissionRepository for StubBackend {
    async fn insert(&self, _submission: &NewSubmission) -> Result<Submission, DomainError> {
        unimplemented!("not exercised")
    }

    async fn list(
        &self,
        _form_id: Uuid,
        _page: Page,
    ) -> Result<(Vec<Submission>, i64), DomainError> {
        Ok((Vec::new(), 0))
    }

    async fn list_all(&self, _form_id: Uuid) -> Result<Vec<Submission>, DomainError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _form_id: Uuid,
        _submission_id: Uuid,
    ) -> Result<Option<Submission>, DomainError> {
        Ok(None)
    }

    async fn delete(&self, _form_id: Uuid, _submission_id: Uuid) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn delete_many(&self, _form_id: Uuid, _ids: &[Uuid]) -> Result<u64, DomainError> {
        Ok(0)
    }
}

#[async_trait]
impl StatsReader for StubBackend {
    async fn dashboard(&self, _user_id: Uuid) -> Result<DashboardStats, DomainError> {
        Ok(DashboardStats {
            total_forms: 0,
            total_submissions: 0,
            submissions_this_month: 0,
            submissions_by_day: Vec::new(),
            top_forms: Vec::new(),
        })
    }

    async fn usage(&self, _user_id: Uuid) -> Result<UsageStats, DomainError> {
        Ok(UsageStats {
            forms_used: 0,
            submissions_this_month: 0,
        })
    }
}

#[async_trait]
impl BillingReader for StubBackend {
    async fn history_for_user(&self, _user_id: Uuid) -> Result<Vec<HistoryEntry>, DomainError> {
        Ok(Vec::new())
    }

    async fn payments_for_user(
        &self,
        _user_id: Uuid,
        _page: Page,
    ) -> Result<(Vec<Payment>, i64), DomainError> {
        Ok((Vec::new(), 0))
    }

    async fn payment_for_user(
        &self,
        _user_id: Uuid,
        _payment_id: Uuid,
    ) -> Result<Option<Payment>, DomainError> {
        Ok(None)
    }
}

#[async_trait]
impl PaymentMethodRepository for StubBackend {
    async fn list(&self, _user_id: Uuid) -> Result<Vec<PaymentMethod>, DomainError> {
        Ok(Vec::new())
    }

    async fn add(&self, _method: &NewPaymentMethod) -> Result<PaymentMethod, DomainError> {
        unimplemented!("not exercised")
    }

    async fn set_default(&self, _user_id: Uuid, _method_id: Uuid) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }

    async fn delete(&self, _user_id: Uuid, _method_id: Uuid) -> Result<(), DomainError> {
        unimplemented!("not exercised")
    }
}

fn stub_services() -> AppServices {
    let backend = Arc::new(StubBackend);
    let tokens = TokenService::new("integration_test_secret", 7);

    AppServices {
        auth: AuthService::new(backend.clone(), PasswordHasher::new(4), tokens.clone()),
        forms: FormService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
        ),
        subscriptions: SubscriptionService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            Arc::new(MockGateway::new()),
            GatewaySignatures::new("key_secret", "webhook_secret"),
            "rzp_test_key".to_string(),
            "INR".to_string(),
        ),
        billing: BillingService::new(backend.clone(), backend.clone(), backend),
        tokens,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_router_wiring() {
    // Verify every handler group wires into the router
    let _app = app_router(stub_services());
}

#[test]
fn test_register_request_deserializes() {
    let json_str = json!({
        "name": "Asha",
        "email": "asha@example.com",
        "password": "hunter22"
    })
    .to_string();

    let req: RegisterRequest = serde_json::from_str(&json_str).unwrap();
    assert_eq!(req.name, "Asha");
    assert_eq!(req.email, "asha@example.com");
    assert_eq!(req.password, "hunter22");
}

#[test]
fn test_login_request_deserializes() {
    let json_str = json!({
        "email": "asha@example.com",
        "password": "hunter22"
    })
    .to_string();

    let req: LoginRequest = serde_json::from_str(&json_str).unwrap();
    assert_eq!(req.email, "asha@example.com");
}

#[test]
fn test_select_plan_request_deserializes() {
    let plan_id = Uuid::new_v4();
    let json_str = json!({
        "plan_id": plan_id,
        "interval": "yearly"
    })
    .to_string();

    let req: SelectPlanRequest = serde_json::from_str(&json_str).unwrap();
    assert_eq!(req.plan_id, plan_id);
    assert_eq!(req.interval, BillingInterval::Yearly);
}

#[test]
fn test_select_plan_rejects_unknown_interval() {
    let json_str = json!({
        "plan_id": Uuid::new_v4(),
        "interval": "weekly"
    })
    .to_string();

    assert!(serde_json::from_str::<SelectPlanRequest>(&json_str).is_err());
}

#[test]
fn test_verify_payment_request_uses_gateway_field_names() {
    let json_str = json!({
        "razorpay_order_id": "order_1",
        "razorpay_payment_id": "pay_1",
        "razorpay_signature": "deadbeef"
    })
    .to_string();

    let req: VerifyPaymentRequest = serde_json::from_str(&json_str).unwrap();
    assert_eq!(req.razorpay_order_id, "order_1");
    assert_eq!(req.razorpay_payment_id, "pay_1");
    assert_eq!(req.razorpay_signature, "deadbeef");
}

#[test]
fn test_webhook_response_serializes() {
    let processed = serde_json::to_value(WebhookResponse::from(WebhookOutcome::Processed)).unwrap();
    assert_eq!(processed["status"], "processed");
    assert!(processed.get("reason").is_none());

    let ignored = serde_json::to_value(WebhookResponse::from(WebhookOutcome::Ignored(
        "refund.processed".to_string(),
    )))
    .unwrap();
    assert_eq!(ignored["status"], "ignored");
    assert_eq!(ignored["reason"], "refund.processed");

    let duplicate =
        serde_json::to_value(WebhookResponse::from(WebhookOutcome::AlreadyProcessed)).unwrap();
    assert_eq!(duplicate["status"], "already_processed");
}

#[test]
fn test_form_input_defaults() {
    let input: FormInput = serde_json::from_str(&json!({ "title": "Contact" }).to_string()).unwrap();
    assert_eq!(input.title, "Contact");
    assert!(input.spam_protection);
    assert!(input.fields.is_empty());
    assert!(input.redirect_url.is_none());
}

#[test]
fn test_page_query_defaults_and_clamping() {
    let empty = PageQuery::default();
    let page: Page = empty.into();
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 20);

    let oversized = PageQuery {
        page: Some(0),
        limit: Some(5000),
    };
    let page: Page = oversized.into();
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 100);
}

#[test]
fn test_bulk_delete_request_deserializes() {
    let ids = [Uuid::new_v4(), Uuid::new_v4()];
    let json_str = json!({ "ids": ids }).to_string();

    let req: BulkDeleteRequest = serde_json::from_str(&json_str).unwrap();
    assert_eq!(req.ids.len(), 2);
    assert_eq!(req.ids[0], ids[0]);
}

#[test]
fn test_add_payment_method_provider_defaults_to_razorpay() {
    let json_str = json!({ "gateway_method_id": "pm_1", "last_four": "4242" }).to_string();

    let req: AddPaymentMethodRequest = serde_json::from_str(&json_str).unwrap();
    assert_eq!(req.provider, "razorpay");
    assert_eq!(req.gateway_method_id, "pm_1");
    assert_eq!(req.last_four.as_deref(), Some("4242"));
    assert!(req.expiry_month.is_none());
}
