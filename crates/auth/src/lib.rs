//! `simplebank-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod password;
pub mod principal;
pub mod role;

pub use password::{PasswordError, hash_password, verify_password};
pub use principal::Principal;
pub use role::Role;
