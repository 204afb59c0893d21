//! Authentication domain: password hashing and bearer tokens.

pub mod password;
pub mod token;

pub use password::PasswordHasher;
pub use token::{Claims, TokenService};
