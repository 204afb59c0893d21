//! Payment gateway adapters.

pub mod mock;
pub mod razorpay;

pub use mock::MockGateway;
pub use razorpay::{RazorpayConfig, RazorpayGateway};
