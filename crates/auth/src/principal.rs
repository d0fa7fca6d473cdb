use serde::{Deserialize, Serialize};

use simplebank_core::UserId;

use crate::Role;

/// Identity of an authenticated caller, resolved from Basic credentials by
/// the transport layer and attached to the request for the duration of one
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: UserId,
    username: String,
    roles: Vec<Role>,
}

impl Principal {
    pub fn new(user_id: UserId, username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id,
            username: username.into(),
            roles,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_user(&self) -> bool {
        self.has_role(Role::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_checks_reflect_granted_roles() {
        let p = Principal::new(UserId::new(), "anna", vec![Role::User]);
        assert!(p.is_user());
        assert!(!p.is_admin());
    }
}
