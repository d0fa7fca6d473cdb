//! Ownership checks applied before any core operation mutates state.

use simplebank_core::{DomainError, DomainResult, UserId};

use crate::account::Account;

pub fn owns_account(caller: UserId, account: &Account) -> bool {
    account.owner_id == caller
}

/// Visibility rule for single-account operations: an account the caller does
/// not own is indistinguishable from a missing one, so account ids cannot be
/// probed across users.
pub fn ensure_visible(caller: UserId, account: &Account) -> DomainResult<()> {
    if owns_account(caller, account) {
        Ok(())
    } else {
        Err(DomainError::AccountNotFound)
    }
}

/// Debit rule for transfers: a caller may debit only their own account. The
/// credit side is unconstrained.
pub fn ensure_debit_allowed(caller: UserId, account: &Account) -> DomainResult<()> {
    if owns_account(caller, account) {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplebank_core::Currency;

    #[test]
    fn foreign_account_is_invisible_but_debit_is_forbidden() {
        let owner = UserId::new();
        let stranger = UserId::new();
        let account = Account::open(owner, Currency::Usd, 100).unwrap();

        assert!(owns_account(owner, &account));
        assert!(ensure_visible(owner, &account).is_ok());
        assert_eq!(
            ensure_visible(stranger, &account).unwrap_err(),
            DomainError::AccountNotFound
        );
        assert_eq!(
            ensure_debit_allowed(stranger, &account).unwrap_err(),
            DomainError::Forbidden
        );
    }
}
