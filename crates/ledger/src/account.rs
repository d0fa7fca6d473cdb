//! Account entity and pure balance operations.

use serde::{Deserialize, Serialize};

use simplebank_core::{AccountId, Currency, DomainError, DomainResult, UserId};

/// A single-currency account balance owned by one user.
///
/// # Invariants
/// - `balance` is non-negative at every observation point.
/// - `owner_id` and `currency` are immutable after creation.
/// - Mutation happens only through [`Account::deposit`] and
///   [`Account::withdraw`]; both validate before touching state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner_id: UserId,
    pub currency: Currency,
    balance: i64,
}

impl Account {
    /// Open an account with a starting balance.
    ///
    /// Accounts exist only via user provisioning; a negative starting balance
    /// is a configuration error, not a business-rule one.
    pub fn open(owner_id: UserId, currency: Currency, starting_balance: i64) -> DomainResult<Self> {
        if starting_balance < 0 {
            return Err(DomainError::validation(
                "starting balance must be non-negative",
            ));
        }
        Ok(Self {
            id: AccountId::new(),
            owner_id,
            currency,
            balance: starting_balance,
        })
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Credit the account. Returns the post-deposit balance.
    pub fn deposit(&mut self, amount: i64) -> DomainResult<i64> {
        self.balance = deposit(self.balance, amount)?;
        Ok(self.balance)
    }

    /// Debit the account. Returns the post-withdraw balance.
    pub fn withdraw(&mut self, amount: i64) -> DomainResult<i64> {
        self.balance = withdraw(self.balance, self.currency, amount)?;
        Ok(self.balance)
    }
}

/// Compute the balance after a deposit.
///
/// Requires `amount > 0`. No upper bound is enforced; an i64 overflow is a
/// storage-level failure rather than silent wraparound.
pub fn deposit(balance: i64, amount: i64) -> DomainResult<i64> {
    if amount <= 0 {
        return Err(DomainError::InvalidAmount);
    }
    balance
        .checked_add(amount)
        .ok_or_else(|| DomainError::storage("balance overflow"))
}

/// Compute the balance after a withdrawal.
///
/// Requires `amount > 0` and `balance >= amount`; the insufficient-funds
/// error carries the requested amount and the account currency.
pub fn withdraw(balance: i64, currency: Currency, amount: i64) -> DomainResult<i64> {
    if amount <= 0 {
        return Err(DomainError::InvalidAmount);
    }
    if balance < amount {
        return Err(DomainError::insufficient_funds(amount, currency));
    }
    Ok(balance - amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_account(balance: i64) -> Account {
        let mut account = Account::open(UserId::new(), Currency::Usd, 0).unwrap();
        account.balance = balance;
        account
    }

    #[test]
    fn deposit_increases_balance() {
        let mut account = test_account(1500);
        assert_eq!(account.deposit(500).unwrap(), 2000);
        assert_eq!(account.balance(), 2000);
    }

    #[test]
    fn withdraw_decreases_balance() {
        let mut account = test_account(1500);
        assert_eq!(account.withdraw(500).unwrap(), 1000);
        assert_eq!(account.balance(), 1000);
    }

    #[test]
    fn non_positive_amounts_are_rejected_without_mutation() {
        let mut account = test_account(1500);
        for amount in [0, -1, -500] {
            assert_eq!(account.deposit(amount).unwrap_err(), DomainError::InvalidAmount);
            assert_eq!(account.withdraw(amount).unwrap_err(), DomainError::InvalidAmount);
            assert_eq!(account.balance(), 1500);
        }
    }

    #[test]
    fn overdraw_reports_amount_and_currency() {
        let mut account = test_account(1500);
        let err = account.withdraw(2000).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientFunds {
                amount: 2000,
                currency: Currency::Usd,
            }
        );
        assert_eq!(err.to_string(), "Cannot withdraw 2000 USD");
        assert_eq!(account.balance(), 1500);
    }

    #[test]
    fn withdrawing_the_full_balance_reaches_exactly_zero() {
        let mut account = test_account(1500);
        assert_eq!(account.withdraw(1500).unwrap(), 0);
    }

    #[test]
    fn deposit_overflow_is_a_storage_failure() {
        let err = deposit(i64::MAX, 1).unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[test]
    fn negative_starting_balance_is_rejected() {
        assert!(Account::open(UserId::new(), Currency::Rub, -1).is_err());
    }

    proptest! {
        /// Property: deposit followed by withdraw of the same amount restores
        /// the original balance exactly.
        #[test]
        fn deposit_withdraw_round_trip(balance in 0i64..1_000_000, amount in 1i64..1_000_000) {
            let after_deposit = deposit(balance, amount).unwrap();
            let after_withdraw = withdraw(after_deposit, Currency::Eur, amount).unwrap();
            prop_assert_eq!(after_withdraw, balance);
        }

        /// Property: for any sequence of deposits and withdrawals, the balance
        /// is never observed negative.
        #[test]
        fn balance_never_negative(
            ops in prop::collection::vec((any::<bool>(), -100i64..1_000), 0..50)
        ) {
            let mut account = test_account(500);
            for (is_deposit, amount) in ops {
                let result = if is_deposit {
                    account.deposit(amount)
                } else {
                    account.withdraw(amount)
                };
                if let Ok(balance) = result {
                    prop_assert_eq!(balance, account.balance());
                }
                prop_assert!(account.balance() >= 0);
            }
        }
    }
}
