//! Subscription lifecycle engine.
//!
//! Owns every transition of the subscription state machine:
//! `none -> pending -> active -> {cancelled, expired, halted}`, with
//! downgrade resetting any state to `none`. Writes go through the
//! [`SubscriptionStore`] port; the gateway client and signature verifier
//! are injected collaborators.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::billing::{NewHistoryEntry, NewPayment};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::{
    BillingInterval, GatewayEvent, GatewaySignatures, HistoryStatus, OrderNotes, PaymentStatus,
    Plan, SubscriptionEntity, SubscriptionStatus,
};
use crate::domain::users::User;
use crate::ports::{
    ActivationRecord, CreateOrderRequest, LedgerOutcome, PaymentGateway, PlanRepository,
    ProcessedWebhook, SaveResult, SubscriptionStore, UserRepository, WebhookLedger,
};

/// Fallback method name recorded when the gateway does not say how a
/// payment was made.
const DEFAULT_PAYMENT_METHOD: &str = "razorpay";

/// Checkout handle returned from plan selection. The client opens the
/// gateway's checkout with these values.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOrder {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

/// A user's subscription as presented to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    pub tier: String,
    pub status: SubscriptionStatus,
    pub plan: Option<Plan>,
    pub start_date: Option<chrono::DateTime<Utc>>,
    pub end_date: Option<chrono::DateTime<Utc>>,
    pub is_active: bool,
}

/// How a webhook delivery was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Processed,
    /// The event id was already in the ledger; no effects were applied.
    AlreadyProcessed,
    /// The event carried nothing actionable (unknown type, unresolvable
    /// subscription). Acknowledged so the gateway stops retrying.
    Ignored(String),
}

/// The subscription lifecycle engine.
#[derive(Clone)]
pub struct SubscriptionService {
    users: Arc<dyn UserRepository>,
    plans: Arc<dyn PlanRepository>,
    store: Arc<dyn SubscriptionStore>,
    ledger: Arc<dyn WebhookLedger>,
    gateway: Arc<dyn PaymentGateway>,
    signatures: GatewaySignatures,
    key_id: String,
    currency: String,
}

impl SubscriptionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        plans: Arc<dyn PlanRepository>,
        store: Arc<dyn SubscriptionStore>,
        ledger: Arc<dyn WebhookLedger>,
        gateway: Arc<dyn PaymentGateway>,
        signatures: GatewaySignatures,
        key_id: String,
        currency: String,
    ) -> Self {
        Self {
            users,
            plans,
            store,
            ledger,
            gateway,
            signatures,
            key_id,
            currency,
        }
    }

    /// Select a plan: create a gateway order carrying checkout metadata and
    /// mark the user pending. Never activates anything by itself.
    pub async fn select_plan(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        interval: BillingInterval,
    ) -> Result<CheckoutOrder, DomainError> {
        let user = self.require_user(user_id).await?;
        if user.has_active_subscription(Utc::now()) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Subscription is already active; cancel or downgrade first",
            ));
        }

        let plan = self.require_plan(plan_id).await?;

        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount_minor: plan.order_amount_minor(interval),
                currency: self.currency.clone(),
                receipt: format!("rcpt_{}", Uuid::new_v4().simple()),
                notes: OrderNotes {
                    user_id,
                    plan_id,
                    interval,
                },
            })
            .await?;

        self.store.set_pending(user_id, plan_id).await?;

        info!(%user_id, %plan_id, order_id = %order.id, "plan selected, awaiting payment");

        Ok(CheckoutOrder {
            order_id: order.id,
            amount: order.amount_minor,
            currency: order.currency,
            key_id: self.key_id.clone(),
        })
    }

    /// Verify a checkout callback and activate the subscription.
    ///
    /// The signature is checked before anything else; a mismatch leaves
    /// every record untouched. Activation applies the user update, the
    /// history row, and the payment row in a single transaction.
    pub async fn verify_payment(
        &self,
        user_id: Uuid,
        payment_id: &str,
        order_id: &str,
        signature: &str,
    ) -> Result<SubscriptionView, DomainError> {
        let user = self.require_user(user_id).await?;

        self.signatures
            .verify_payment(order_id, payment_id, signature)?;

        let order = self.gateway.fetch_order(order_id).await?;

        // Checkout metadata normally rides on the order; fall back to the
        // pending selection recorded at select time.
        let plan_id = order
            .notes
            .as_ref()
            .map(|n| n.plan_id)
            .or(user.plan_id)
            .ok_or_else(|| {
                DomainError::validation("order", "Order has no plan and user has no pending plan")
            })?;
        let plan = self.require_plan(plan_id).await?;
        let interval = order
            .notes
            .as_ref()
            .map(|n| n.interval)
            .unwrap_or_else(|| plan.interval_for_amount_minor(order.amount_minor));

        let now = Utc::now();
        let end_date = interval.period_end(now);

        let record = ActivationRecord {
            user_id,
            plan_id,
            tier: plan.name.clone(),
            gateway_subscription_id: user.gateway_subscription_id.clone(),
            interval,
            start_date: now,
            end_date,
            payment: NewPayment {
                user_id,
                amount: plan.price_for(interval),
                currency: order.currency.clone(),
                payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
                gateway_payment_id: payment_id.to_string(),
                gateway_subscription_id: user.gateway_subscription_id.clone(),
                status: PaymentStatus::Completed,
            },
        };
        self.store.activate(&record).await?;

        info!(%user_id, %plan_id, %payment_id, "payment verified, subscription active");

        Ok(SubscriptionView {
            tier: plan.name.clone(),
            status: SubscriptionStatus::Active,
            plan: Some(plan),
            start_date: Some(now),
            end_date: Some(end_date),
            is_active: true,
        })
    }

    /// Cancel the subscription. The gateway call is best-effort; local
    /// state is updated regardless.
    pub async fn cancel(&self, user_id: Uuid) -> Result<(), DomainError> {
        let user = self.require_user(user_id).await?;
        let subscription_id = user.gateway_subscription_id.clone().ok_or_else(|| {
            DomainError::new(ErrorCode::NoActiveSubscription, "No active subscription")
        })?;

        if let Err(err) = self.gateway.cancel_subscription(&subscription_id).await {
            warn!(%user_id, %subscription_id, error = %err, "gateway cancel failed, updating local state anyway");
        }

        let history = NewHistoryEntry {
            user_id,
            plan_id: user.plan_id,
            gateway_subscription_id: Some(subscription_id),
            gateway_payment_id: None,
            status: HistoryStatus::Cancelled,
            billing_cycle: None,
            start_date: user.subscription_start_date.unwrap_or_else(Utc::now),
            end_date: user.subscription_end_date,
        };
        self.store
            .transition(user_id, SubscriptionStatus::Cancelled, Some(&history))
            .await?;

        info!(%user_id, "subscription cancelled");
        Ok(())
    }

    /// Downgrade to the free tier. A no-op for users already there.
    pub async fn downgrade(&self, user_id: Uuid) -> Result<(), DomainError> {
        let user = self.require_user(user_id).await?;
        if user.is_free() {
            return Ok(());
        }

        if let Some(subscription_id) = &user.gateway_subscription_id {
            if let Err(err) = self.gateway.cancel_subscription(subscription_id).await {
                warn!(%user_id, %subscription_id, error = %err, "gateway cancel failed during downgrade");
            }
        }

        let history = NewHistoryEntry {
            user_id,
            plan_id: user.plan_id,
            gateway_subscription_id: user.gateway_subscription_id.clone(),
            gateway_payment_id: None,
            status: HistoryStatus::Downgraded,
            billing_cycle: None,
            start_date: Utc::now(),
            end_date: None,
        };
        self.store.downgrade(user_id, &history).await?;

        info!(%user_id, "downgraded to free tier");
        Ok(())
    }

    /// The user's current subscription.
    pub async fn current(&self, user_id: Uuid) -> Result<SubscriptionView, DomainError> {
        let user = self.require_user(user_id).await?;
        let plan = match user.plan_id {
            Some(plan_id) => self.plans.find_by_id(plan_id).await?,
            None => None,
        };
        Ok(SubscriptionView {
            tier: user.subscription_tier.clone(),
            status: user.subscription_status,
            is_active: user.has_active_subscription(Utc::now()),
            start_date: user.subscription_start_date,
            end_date: user.subscription_end_date,
            plan,
        })
    }

    /// Process a gateway webhook delivery.
    ///
    /// Order of checks: signature over the exact raw bytes, then parse,
    /// then the dedup ledger, then effects. The ledger entry is written
    /// after the effects; a concurrent delivery losing the insert race is
    /// reported as already processed.
    pub async fn handle_webhook(
        &self,
        raw_body: &[u8],
        signature: &str,
        event_id: Option<&str>,
    ) -> Result<WebhookOutcome, DomainError> {
        self.signatures.verify_webhook(raw_body, signature)?;

        let event = GatewayEvent::parse(raw_body)?;

        if let Some(id) = event_id {
            if self.ledger.find(id).await?.is_some() {
                info!(event_id = %id, kind = %event.kind(), "webhook already processed, skipping");
                return Ok(WebhookOutcome::AlreadyProcessed);
            }
        }

        let result = self.apply_event(&event).await;

        if let Some(id) = event_id {
            let outcome = match &result {
                Ok(WebhookOutcome::Processed) => LedgerOutcome::Processed,
                Ok(_) => LedgerOutcome::Ignored,
                Err(_) => LedgerOutcome::Failed,
            };
            let saved = self
                .ledger
                .save(&ProcessedWebhook {
                    event_id: id.to_string(),
                    event_type: event.kind().to_string(),
                    outcome,
                    processed_at: Utc::now(),
                })
                .await?;
            if saved == SaveResult::AlreadyExists {
                warn!(event_id = %id, "concurrent webhook delivery detected");
            }
        }

        result
    }

    async fn apply_event(&self, event: &GatewayEvent) -> Result<WebhookOutcome, DomainError> {
        match event {
            GatewayEvent::SubscriptionActivated { subscription } => {
                let Some(user) = self.resolve_subscriber(subscription).await? else {
                    return Ok(ignored(subscription, "no matching user"));
                };
                let Some(plan) = self.resolve_plan(subscription, &user).await? else {
                    return Ok(ignored(subscription, "no matching plan"));
                };
                self.store
                    .mark_active(user.id, &plan.name, plan.id, &subscription.id)
                    .await?;
                info!(user_id = %user.id, tier = %plan.name, "subscription activated by webhook");
                Ok(WebhookOutcome::Processed)
            }

            GatewayEvent::SubscriptionCharged {
                subscription,
                payment,
            } => {
                let Some(user) = self.resolve_subscriber(subscription).await? else {
                    return Ok(ignored(subscription, "no matching user"));
                };
                let interval = self.resolve_interval(subscription, &user, payment.amount_minor).await?;
                // Renewal extends from now, not from the previous expiry;
                // the dedup ledger keeps redelivery from stacking periods.
                let new_end_date = interval.period_end(Utc::now());
                let record = NewPayment {
                    user_id: user.id,
                    amount: payment.amount_minor / 100,
                    currency: payment.currency.clone(),
                    payment_method: payment
                        .method
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
                    gateway_payment_id: payment.id.clone(),
                    gateway_subscription_id: Some(subscription.id.clone()),
                    status: PaymentStatus::Completed,
                };
                self.store
                    .record_charge(user.id, &record, new_end_date)
                    .await?;
                info!(user_id = %user.id, payment_id = %payment.id, %new_end_date, "renewal charge recorded");
                Ok(WebhookOutcome::Processed)
            }

            GatewayEvent::SubscriptionCancelled { subscription } => {
                self.transition_subscriber(
                    subscription,
                    SubscriptionStatus::Cancelled,
                    HistoryStatus::Cancelled,
                )
                .await
            }

            GatewayEvent::SubscriptionHalted { subscription } => {
                self.transition_subscriber(
                    subscription,
                    SubscriptionStatus::Halted,
                    HistoryStatus::Halted,
                )
                .await
            }

            GatewayEvent::PaymentFailed { payment } => {
                let Some(subscription_id) = &payment.subscription_id else {
                    return Ok(WebhookOutcome::Ignored(
                        "failed payment without subscription reference".to_string(),
                    ));
                };
                let Some(user) = self
                    .store
                    .find_user_by_subscription(subscription_id)
                    .await?
                else {
                    return Ok(WebhookOutcome::Ignored(
                        "failed payment for unknown subscription".to_string(),
                    ));
                };
                let record = NewPayment {
                    user_id: user.id,
                    amount: payment.amount_minor / 100,
                    currency: payment.currency.clone(),
                    payment_method: payment
                        .method
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
                    gateway_payment_id: payment.id.clone(),
                    gateway_subscription_id: Some(subscription_id.clone()),
                    status: PaymentStatus::Failed,
                };
                self.store.insert_payment(&record).await?;
                warn!(user_id = %user.id, payment_id = %payment.id, "payment failed");
                Ok(WebhookOutcome::Processed)
            }

            GatewayEvent::Unknown { event } => Ok(WebhookOutcome::Ignored(event.clone())),
        }
    }

    async fn transition_subscriber(
        &self,
        subscription: &SubscriptionEntity,
        status: SubscriptionStatus,
        history_status: HistoryStatus,
    ) -> Result<WebhookOutcome, DomainError> {
        let Some(user) = self.resolve_subscriber(subscription).await? else {
            return Ok(ignored(subscription, "no matching user"));
        };
        let history = NewHistoryEntry {
            user_id: user.id,
            plan_id: user.plan_id,
            gateway_subscription_id: Some(subscription.id.clone()),
            gateway_payment_id: None,
            status: history_status,
            billing_cycle: None,
            start_date: user.subscription_start_date.unwrap_or_else(Utc::now),
            end_date: user.subscription_end_date,
        };
        self.store
            .transition(user.id, status, Some(&history))
            .await?;
        info!(user_id = %user.id, status = %status.as_str(), "subscription transitioned by webhook");
        Ok(WebhookOutcome::Processed)
    }

    /// Find the user a webhook subscription entity refers to: checkout
    /// metadata first, then the stored gateway subscription id.
    async fn resolve_subscriber(
        &self,
        subscription: &SubscriptionEntity,
    ) -> Result<Option<User>, DomainError> {
        if let Some(notes) = &subscription.notes {
            if let Some(user) = self.users.find_by_id(notes.user_id).await? {
                return Ok(Some(user));
            }
        }
        self.store.find_user_by_subscription(&subscription.id).await
    }

    async fn resolve_plan(
        &self,
        subscription: &SubscriptionEntity,
        user: &User,
    ) -> Result<Option<Plan>, DomainError> {
        let plan_id = subscription.notes.as_ref().map(|n| n.plan_id).or(user.plan_id);
        match plan_id {
            Some(id) => self.plans.find_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn resolve_interval(
        &self,
        subscription: &SubscriptionEntity,
        user: &User,
        amount_minor: i64,
    ) -> Result<BillingInterval, DomainError> {
        if let Some(notes) = &subscription.notes {
            return Ok(notes.interval);
        }
        Ok(self
            .resolve_plan(subscription, user)
            .await?
            .map(|plan| plan.interval_for_amount_minor(amount_minor))
            .unwrap_or(BillingInterval::Monthly))
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))
    }

    async fn require_plan(&self, plan_id: Uuid) -> Result<Plan, DomainError> {
        self.plans
            .find_by_id(plan_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::PlanNotFound, "Plan not found"))
    }
}

fn ignored(subscription: &SubscriptionEntity, reason: &str) -> WebhookOutcome {
    warn!(subscription_id = %subscription.id, reason, "webhook event ignored");
    WebhookOutcome::Ignored(reason.to_string())
}
