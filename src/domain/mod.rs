//! Domain layer: pure types and rules, no I/O.

pub mod auth;
pub mod billing;
pub mod forms;
pub mod foundation;
pub mod subscription;
pub mod users;
