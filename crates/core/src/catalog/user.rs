//! User roles and the visibility scope they grant.

use serde::{Deserialize, Serialize};
use tally_shared::types::UserId;

use super::error::CatalogError;

/// Role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Sees every user's transactions and plans.
    Admin,
    /// Sees only their own transactions and plans.
    Manager,
}

impl UserRole {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            _ => Err(CatalogError::InvalidRole(s.to_string())),
        }
    }
}

/// Which users' records a query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserScope {
    /// Every user's records.
    All,
    /// Only records owned by this user.
    Owner(UserId),
}

impl UserScope {
    /// Derives the scope of an acting user from their role.
    #[must_use]
    pub const fn for_user(user_id: UserId, role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::All,
            UserRole::Manager => Self::Owner(user_id),
        }
    }

    /// Returns true if a record owned by `owner` is visible in this scope.
    #[must_use]
    pub fn allows(&self, owner: UserId) -> bool {
        match self {
            Self::All => true,
            Self::Owner(user_id) => *user_id == owner,
        }
    }

    /// Returns the owner restriction, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<UserId> {
        match self {
            Self::All => None,
            Self::Owner(user_id) => Some(*user_id),
        }
    }
}
