//! The bank service: deposits, withdrawals, transfers, and user provisioning.
//!
//! All balance mutation funnels through this type. Each operation acquires
//! the per-account locks it needs, validates, mutates, and persists before
//! releasing, so mutations on any one account are linearizable and the
//! non-negative invariant holds at every serialization point.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use simplebank_auth::Role;
use simplebank_core::{AccountId, Currency, DomainError, DomainResult, UserId};

use crate::access;
use crate::account::Account;
use crate::store::AccountStore;
use crate::user::{UserDirectory, UserRecord};

/// One atomic move of `amount` minor units between two accounts.
///
/// Ephemeral: fully resolved into two account mutations or rejected entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_account_id: AccountId,
    pub to_user_id: UserId,
    pub to_account_id: AccountId,
    pub amount: i64,
}

/// Lock table handing out one mutex per account.
///
/// Entries are created on demand and never removed; accounts live as long as
/// their owner, so the table only grows with the account population.
#[derive(Debug, Default)]
struct LockTable {
    inner: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl LockTable {
    fn handle(&self, id: AccountId) -> DomainResult<Arc<Mutex<()>>> {
        let mut table = self
            .inner
            .lock()
            .map_err(|_| DomainError::storage("lock table poisoned"))?;
        Ok(table.entry(id).or_default().clone())
    }
}

fn acquire(lock: &Mutex<()>) -> DomainResult<MutexGuard<'_, ()>> {
    lock.lock()
        .map_err(|_| DomainError::storage("account lock poisoned"))
}

/// The ledger core service.
pub struct Bank<S, D> {
    accounts: S,
    users: D,
    locks: LockTable,
    starting_balance: i64,
}

impl<S, D> Bank<S, D>
where
    S: AccountStore,
    D: UserDirectory,
{
    pub fn new(accounts: S, users: D, starting_balance: i64) -> Self {
        Self {
            accounts,
            users,
            locks: LockTable::default(),
            starting_balance,
        }
    }

    /// Register a banking user and provision one account per currency.
    ///
    /// The directory record is only created once account provisioning is
    /// known to succeed, so a rejected registration leaves the username
    /// available.
    pub fn register_user(&self, username: &str, password_hash: &str) -> DomainResult<UserRecord> {
        if self.starting_balance < 0 {
            return Err(DomainError::validation("starting balance must be non-negative"));
        }

        let record = self.users.create(username, password_hash, vec![Role::User])?;

        let accounts = Currency::ALL
            .iter()
            .map(|currency| Account::open(record.id, *currency, self.starting_balance))
            .collect::<DomainResult<Vec<_>>>()?;
        self.accounts.save_all(&accounts)?;

        tracing::info!(user_id = %record.id, username, "registered user");
        Ok(record)
    }

    /// Register an administrator. Administrators hold no accounts.
    pub fn register_admin(&self, username: &str, password_hash: &str) -> DomainResult<UserRecord> {
        let record = self.users.create(username, password_hash, vec![Role::Admin])?;
        tracing::info!(user_id = %record.id, username, "registered admin");
        Ok(record)
    }

    /// Fetch a single account, scoped to its owner.
    pub fn account(&self, caller: UserId, id: AccountId) -> DomainResult<Account> {
        let account = self.accounts.get(id).ok_or(DomainError::AccountNotFound)?;
        access::ensure_visible(caller, &account)?;
        Ok(account)
    }

    /// All accounts of a user, stable order.
    pub fn accounts_of(&self, user_id: UserId) -> Vec<Account> {
        self.accounts.list_for_user(user_id)
    }

    /// Credit the caller's account. Returns the updated account.
    pub fn deposit(&self, caller: UserId, id: AccountId, amount: i64) -> DomainResult<Account> {
        if amount <= 0 {
            return Err(DomainError::InvalidAmount);
        }

        let handle = self.locks.handle(id)?;
        let _guard = acquire(&handle)?;

        let mut account = self.account(caller, id)?;
        let balance = account.deposit(amount)?;
        self.accounts.save(account.clone())?;

        tracing::info!(account_id = %id, amount, balance, "deposit");
        Ok(account)
    }

    /// Debit the caller's account. Returns the updated account.
    pub fn withdraw(&self, caller: UserId, id: AccountId, amount: i64) -> DomainResult<Account> {
        if amount <= 0 {
            return Err(DomainError::InvalidAmount);
        }

        let handle = self.locks.handle(id)?;
        let _guard = acquire(&handle)?;

        let mut account = self.account(caller, id)?;
        let balance = account.withdraw(amount)?;
        self.accounts.save(account.clone())?;

        tracing::info!(account_id = %id, amount, balance, "withdraw");
        Ok(account)
    }

    /// Move money between two accounts as one atomic unit.
    ///
    /// Validation order (any failure leaves both balances untouched):
    /// amount, from-account existence, from-account ownership, to-user
    /// existence, to-account existence under the to-user, currency match,
    /// sufficient funds.
    pub fn transfer(&self, caller: UserId, request: TransferRequest) -> DomainResult<()> {
        if request.amount <= 0 {
            return Err(DomainError::InvalidAmount);
        }

        // Lock both rows in ascending account-id order regardless of the
        // from/to direction, so opposing transfers cannot deadlock.
        let (lo, hi) = if request.from_account_id <= request.to_account_id {
            (request.from_account_id, request.to_account_id)
        } else {
            (request.to_account_id, request.from_account_id)
        };
        let lo_handle = self.locks.handle(lo)?;
        let hi_handle = self.locks.handle(hi)?;
        let _lo_guard = acquire(&lo_handle)?;
        let _hi_guard = if lo == hi { None } else { Some(acquire(&hi_handle)?) };

        let mut from = self
            .accounts
            .get(request.from_account_id)
            .ok_or(DomainError::AccountNotFound)?;
        access::ensure_debit_allowed(caller, &from)?;

        if self.users.get(request.to_user_id).is_none() {
            return Err(DomainError::UserNotFound);
        }

        let mut to = self
            .accounts
            .get(request.to_account_id)
            .filter(|a| a.owner_id == request.to_user_id)
            .ok_or(DomainError::AccountNotFound)?;

        if from.currency != to.currency {
            return Err(DomainError::CurrencyMismatch);
        }

        if request.from_account_id == request.to_account_id {
            // Self-transfer: the debit and credit land on the same row and
            // net to zero, but the full rule set still applies.
            from.withdraw(request.amount)?;
            from.deposit(request.amount)?;
            self.accounts.save(from)?;
        } else {
            from.withdraw(request.amount)?;
            to.deposit(request.amount)?;
            self.accounts.save_all(&[from, to])?;
        }

        tracing::info!(
            from = %request.from_account_id,
            to = %request.to_account_id,
            amount = request.amount,
            "transfer"
        );
        Ok(())
    }
}
