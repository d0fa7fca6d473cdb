//! `simplebank-ledger` — the account ledger and transfer engine.
//!
//! Enforces balance, currency, and ownership invariants across deposit,
//! withdraw, and transfer, with linearizable per-account mutation and atomic
//! two-account transfers. Storage sits behind trait seams so the engine is
//! independent of the persistence technology.

pub mod access;
pub mod account;
pub mod service;
pub mod store;
pub mod user;

pub use access::owns_account;
pub use account::Account;
pub use service::{Bank, TransferRequest};
pub use store::{AccountStore, InMemoryAccountStore};
pub use user::{InMemoryUserDirectory, UserDirectory, UserRecord};
