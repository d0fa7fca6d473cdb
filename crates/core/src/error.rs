//! Domain error model.

use thiserror::Error;

use crate::currency::Currency;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// invariants, authorization). Infrastructure concerns surface only through
/// `Storage`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A deposit, withdrawal, or transfer amount was not strictly positive.
    #[error("amount must be positive")]
    InvalidAmount,

    /// A debit would drive the balance negative.
    ///
    /// The display text is part of the HTTP contract and must stay exactly
    /// `Cannot withdraw {amount} {currency}`.
    #[error("Cannot withdraw {amount} {currency}")]
    InsufficientFunds { amount: i64, currency: Currency },

    /// Transfer between accounts held in different currencies.
    #[error("cannot transfer between accounts in different currencies")]
    CurrencyMismatch,

    /// The referenced account does not exist (or is not visible to the caller).
    #[error("account not found")]
    AccountNotFound,

    /// The referenced user does not exist.
    #[error("user not found")]
    UserNotFound,

    /// Authenticated but not allowed to act on the target resource.
    #[error("forbidden")]
    Forbidden,

    /// Missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// A uniqueness conflict (duplicate username on registration).
    #[error("username is already taken: {0}")]
    Conflict(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Storage-level failure, distinct from every business-rule error.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn insufficient_funds(amount: i64, currency: Currency) -> Self {
        Self::InsufficientFunds { amount, currency }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(username: impl Into<String>) -> Self {
        Self::Conflict(username.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_message_names_amount_and_currency() {
        let err = DomainError::insufficient_funds(2000, Currency::Usd);
        assert_eq!(err.to_string(), "Cannot withdraw 2000 USD");
    }
}
