//! Adapters: infrastructure implementations of the ports.

pub mod gateway;
pub mod http;
pub mod postgres;
