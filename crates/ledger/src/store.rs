//! Account storage seam.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use simplebank_core::{AccountId, DomainError, DomainResult, UserId};

use crate::account::Account;

/// Durable keyed storage of accounts, indexed by owning user.
///
/// `save_all` is the atomicity point for multi-account mutations: every
/// account in the batch becomes visible together, or none does. The engine
/// serializes writers through its lock table; implementations only have to
/// keep reads consistent with that single visibility point.
pub trait AccountStore: Send + Sync {
    fn get(&self, id: AccountId) -> Option<Account>;
    fn list_for_user(&self, user_id: UserId) -> Vec<Account>;
    fn save(&self, account: Account) -> DomainResult<()>;
    fn save_all(&self, accounts: &[Account]) -> DomainResult<()>;
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn get(&self, id: AccountId) -> Option<Account> {
        (**self).get(id)
    }

    fn list_for_user(&self, user_id: UserId) -> Vec<Account> {
        (**self).list_for_user(user_id)
    }

    fn save(&self, account: Account) -> DomainResult<()> {
        (**self).save(account)
    }

    fn save_all(&self, accounts: &[Account]) -> DomainResult<()> {
        (**self).save_all(accounts)
    }
}

/// In-memory account store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, id: AccountId) -> Option<Account> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn list_for_user(&self, user_id: UserId) -> Vec<Account> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut accounts: Vec<Account> = map
            .values()
            .filter(|a| a.owner_id == user_id)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.id);
        accounts
    }

    fn save(&self, account: Account) -> DomainResult<()> {
        self.save_all(std::slice::from_ref(&account))
    }

    fn save_all(&self, accounts: &[Account]) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::storage("account store lock poisoned"))?;
        for account in accounts {
            map.insert(account.id, account.clone());
        }
        Ok(())
    }
}
