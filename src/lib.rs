//! EasyForms - form building and submission collection backend
//!
//! Authenticated users create forms with typed fields, publish a public
//! submission endpoint per form, collect and query submissions, and pay for
//! usage tiers through a payment gateway with webhook-driven reconciliation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
