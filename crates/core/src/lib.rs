//! `simplebank-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod currency;
pub mod error;
pub mod id;

pub use currency::Currency;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, UserId};
