//! Shared domain foundation types.

pub mod errors;

pub use errors::{DomainError, ErrorCode};
