//! The caller identity consumed by the access gate and both managers.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::UserId;

/// Id carried by [`User::anonymous`]. It never matches a lock holder.
pub const ANONYMOUS_USER_ID: &str = "";

/// A user as seen by the curation core. Supplied read-only by the web layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub is_anonymous: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl User {
    pub fn anonymous() -> Self {
        Self {
            id: ANONYMOUS_USER_ID.to_string(),
            is_anonymous: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    pub fn registered(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            is_anonymous: false,
            is_staff: false,
            is_superuser: false,
        }
    }

    pub fn staff(id: impl Into<UserId>) -> Self {
        Self {
            is_staff: true,
            ..Self::registered(id)
        }
    }

    pub fn superuser(id: impl Into<UserId>) -> Self {
        Self {
            is_staff: true,
            is_superuser: true,
            ..Self::registered(id)
        }
    }

    /// Resolve the effective role. The highest granted privilege wins, so a
    /// superuser flag overrides an inconsistent anonymous flag.
    pub fn role(&self) -> Role {
        if self.is_superuser {
            Role::Superuser
        } else if self.is_anonymous {
            Role::Anonymous
        } else if self.is_staff {
            Role::Staff
        } else {
            Role::Registered
        }
    }

    /// Returns `true` if this user is the named, authenticated user.
    pub fn is(&self, user_id: &str) -> bool {
        !self.is_anonymous && self.id == user_id
    }
}
