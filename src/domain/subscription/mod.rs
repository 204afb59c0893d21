//! Subscription lifecycle domain: plans, states, gateway events, signatures.

pub mod gateway_event;
pub mod plan;
pub mod signature;
pub mod status;

pub use gateway_event::{GatewayEvent, OrderNotes, PaymentEntity, SubscriptionEntity};
pub use plan::{NewPlan, Plan, FREE_TIER};
pub use signature::GatewaySignatures;
pub use status::{BillingInterval, HistoryStatus, PaymentStatus, SubscriptionStatus};
