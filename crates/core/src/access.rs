//! Ownership-based read/write policy shared by locks and version families.
//!
//! A resource is either global (`owner == None`) or owned by one user. The
//! gate is pure: it holds only the anonymous-access flag and performs no I/O.

use crate::config::CurationConfig;
use crate::error::CoreError;
use crate::roles::Role;
use crate::user::User;

/// Read/write eligibility decisions for owned-or-global resources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessGate {
    anonymous_access_shared: bool,
}

impl AccessGate {
    pub fn new(anonymous_access_shared: bool) -> Self {
        Self {
            anonymous_access_shared,
        }
    }

    pub fn from_config(config: &CurationConfig) -> Self {
        Self::new(config.can_anonymous_access_shared_resources)
    }

    /// Whether `user` may see a resource owned by `owner`.
    pub fn can_read(&self, owner: Option<&str>, user: &User) -> bool {
        match user.role() {
            Role::Superuser => true,
            Role::Anonymous => owner.is_none() && self.anonymous_access_shared,
            Role::Registered | Role::Staff => match owner {
                None => true,
                Some(owner) => user.is(owner),
            },
        }
    }

    /// Whether `user` may mutate a resource owned by `owner`.
    pub fn can_write(&self, owner: Option<&str>, user: &User) -> bool {
        match user.role() {
            Role::Superuser => true,
            Role::Anonymous => false,
            Role::Staff => match owner {
                None => true,
                Some(owner) => user.is(owner),
            },
            Role::Registered => match owner {
                None => false,
                Some(owner) => user.is(owner),
            },
        }
    }

    /// [`can_read`](Self::can_read), mapped to [`CoreError::AccessDenied`].
    pub fn ensure_read(&self, owner: Option<&str>, user: &User, what: &str) -> Result<(), CoreError> {
        if self.can_read(owner, user) {
            Ok(())
        } else {
            Err(denied("read", what, user))
        }
    }

    /// [`can_write`](Self::can_write), mapped to [`CoreError::AccessDenied`].
    pub fn ensure_write(
        &self,
        owner: Option<&str>,
        user: &User,
        what: &str,
    ) -> Result<(), CoreError> {
        if self.can_write(owner, user) {
            Ok(())
        } else {
            Err(denied("modify", what, user))
        }
    }
}

fn denied(action: &str, what: &str, user: &User) -> CoreError {
    let who = match user.role() {
        Role::Anonymous => "anonymous user".to_string(),
        _ => format!("user {}", user.id),
    };
    CoreError::AccessDenied(format!("{who} is not allowed to {action} {what}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
