//! User records and the directory seam.
//!
//! The directory is the collaborator boundary the ledger resolves users
//! against; credentials stay opaque here (hashing lives in the auth crate).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use simplebank_auth::Role;
use simplebank_core::{DomainError, DomainResult, UserId};

/// A registered identity.
///
/// Identity is immutable after creation: username, roles, and creation time
/// never change. Banking users additionally own one account per currency,
/// held in the account store and never referenced from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn is_banking_user(&self) -> bool {
        self.roles.contains(&Role::User)
    }
}

/// Keyed storage of users with a unique-username constraint.
pub trait UserDirectory: Send + Sync {
    /// Register a user. Fails with `Conflict` if the username is taken.
    fn create(&self, username: &str, password_hash: &str, roles: Vec<Role>)
    -> DomainResult<UserRecord>;
    fn find_by_username(&self, username: &str) -> Option<UserRecord>;
    fn get(&self, id: UserId) -> Option<UserRecord>;
    /// All users, oldest first.
    fn list(&self) -> Vec<UserRecord>;
}

impl<D> UserDirectory for Arc<D>
where
    D: UserDirectory + ?Sized,
{
    fn create(
        &self,
        username: &str,
        password_hash: &str,
        roles: Vec<Role>,
    ) -> DomainResult<UserRecord> {
        (**self).create(username, password_hash, roles)
    }

    fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        (**self).find_by_username(username)
    }

    fn get(&self, id: UserId) -> Option<UserRecord> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<UserRecord> {
        (**self).list()
    }
}

#[derive(Debug, Default)]
struct DirectoryInner {
    by_id: HashMap<UserId, UserRecord>,
    by_username: HashMap<String, UserId>,
}

/// In-memory user directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<DirectoryInner>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn create(
        &self,
        username: &str,
        password_hash: &str,
        roles: Vec<Role>,
    ) -> DomainResult<UserRecord> {
        if username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| DomainError::storage("user directory lock poisoned"))?;

        if inner.by_username.contains_key(username) {
            return Err(DomainError::conflict(username));
        }

        let record = UserRecord {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            roles,
            created_at: Utc::now(),
        };
        inner.by_username.insert(record.username.clone(), record.id);
        inner.by_id.insert(record.id, record.clone());
        Ok(record)
    }

    fn find_by_username(&self, username: &str) -> Option<UserRecord> {
        let inner = self.inner.read().ok()?;
        let id = inner.by_username.get(username)?;
        inner.by_id.get(id).cloned()
    }

    fn get(&self, id: UserId) -> Option<UserRecord> {
        let inner = self.inner.read().ok()?;
        inner.by_id.get(&id).cloned()
    }

    fn list(&self) -> Vec<UserRecord> {
        let inner = match self.inner.read() {
            Ok(i) => i,
            Err(_) => return vec![],
        };

        let mut users: Vec<UserRecord> = inner.by_id.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        users
    }
}
