//! Mock payment gateway for testing.
//!
//! A configurable in-memory `PaymentGateway`: orders created through it
//! are retrievable by `fetch_order`, cancellations are recorded, and
//! each method can be scripted to fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};

#[derive(Default)]
pub struct MockGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    orders: HashMap<String, GatewayOrder>,
    cancelled: Vec<String>,
    order_seq: u64,
    fail_create: bool,
    fail_fetch: bool,
    fail_cancel: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_create_order(&self) {
        self.inner.lock().unwrap().fail_create = true;
    }

    pub fn fail_fetch_order(&self) {
        self.inner.lock().unwrap().fail_fetch = true;
    }

    pub fn fail_cancel_subscription(&self) {
        self.inner.lock().unwrap().fail_cancel = true;
    }

    /// Seed an order as if it had been created through the gateway.
    pub fn add_order(&self, order: GatewayOrder) {
        let id = order.id.clone();
        self.inner.lock().unwrap().orders.insert(id, order);
    }

    /// Subscription ids that have been cancelled through this mock.
    pub fn cancelled_subscriptions(&self) -> Vec<String> {
        self.inner.lock().unwrap().cancelled.clone()
    }
}

impl Clone for MockGateway {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, req: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        if state.fail_create {
            return Err(GatewayError::Network("mock create_order failure".into()));
        }

        state.order_seq += 1;
        let order = GatewayOrder {
            id: format!("order_mock_{}", state.order_seq),
            amount_minor: req.amount_minor,
            currency: req.currency,
            status: "created".to_string(),
            notes: Some(req.notes),
        };
        state.orders.insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        let state = self.inner.lock().unwrap();
        if state.fail_fetch {
            return Err(GatewayError::Network("mock fetch_order failure".into()));
        }

        state
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(order_id.to_string()))
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), GatewayError> {
        let mut state = self.inner.lock().unwrap();
        if state.fail_cancel {
            return Err(GatewayError::Api {
                status: 502,
                message: "mock cancel failure".into(),
            });
        }

        state.cancelled.push(subscription_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::{BillingInterval, OrderNotes};
    use uuid::Uuid;

    fn order_request() -> CreateOrderRequest {
        CreateOrderRequest {
            amount_minor: 50_000,
            currency: "INR".to_string(),
            receipt: "rcpt_test".to_string(),
            notes: OrderNotes {
                user_id: Uuid::new_v4(),
                plan_id: Uuid::new_v4(),
                interval: BillingInterval::Monthly,
            },
        }
    }

    #[tokio::test]
    async fn created_orders_are_fetchable() {
        let gateway = MockGateway::new();
        let created = gateway.create_order(order_request()).await.unwrap();

        let fetched = gateway.fetch_order(&created.id).await.unwrap();
        assert_eq!(fetched.amount_minor, 50_000);
        assert!(fetched.notes.is_some());
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let gateway = MockGateway::new();
        let result = gateway.fetch_order("order_absent").await;
        assert!(matches!(result, Err(GatewayError::NotFound(_))));
    }

    #[tokio::test]
    async fn cancellations_are_recorded() {
        let gateway = MockGateway::new();
        gateway.cancel_subscription("sub_1").await.unwrap();
        assert_eq!(gateway.cancelled_subscriptions(), vec!["sub_1".to_string()]);
    }

    #[tokio::test]
    async fn scripted_failures_surface() {
        let gateway = MockGateway::new();
        gateway.fail_create_order();
        assert!(gateway.create_order(order_request()).await.is_err());
    }
}
