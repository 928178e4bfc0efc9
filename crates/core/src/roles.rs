//! Well-known role names and the privilege ladder derived from user flags.

use serde::Serialize;

pub const ROLE_ANONYMOUS: &str = "anonymous";
pub const ROLE_REGISTERED: &str = "registered";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_SUPERUSER: &str = "superuser";

/// Effective role of a user. Ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Anonymous,
    Registered,
    Staff,
    Superuser,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Anonymous => ROLE_ANONYMOUS,
            Role::Registered => ROLE_REGISTERED,
            Role::Staff => ROLE_STAFF,
            Role::Superuser => ROLE_SUPERUSER,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
