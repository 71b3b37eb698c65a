//! Catalog error types.

use thiserror::Error;
use uuid::Uuid;

use tally_shared::AppError;

use super::password::PasswordError;

/// Errors raised while validating accounts, users and categories.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Unrecognized account kind.
    #[error("Invalid account type: {0}")]
    InvalidAccountKind(String),

    /// Unrecognized user role.
    #[error("Invalid user role: {0}")]
    InvalidRole(String),

    /// Invalid currency code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Password rejected or not hashable.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// A required name is empty.
    #[error("Name must not be empty")]
    EmptyName,

    /// Parent category does not exist.
    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    /// Re-parenting would make a category its own ancestor.
    #[error("Category {category} cannot be placed under {parent}: would create a cycle")]
    CategoryCycle {
        /// Category being moved.
        category: Uuid,
        /// Requested parent.
        parent: Uuid,
    },
}

impl CatalogError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAccountKind(_) => "INVALID_ACCOUNT_TYPE",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::EmptyName => "EMPTY_NAME",
            Self::Password(PasswordError::TooShort) => "PASSWORD_TOO_SHORT",
            Self::Password(PasswordError::Hash(_)) => "PASSWORD_HASH_FAILED",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::CategoryCycle { .. } => "CATEGORY_CYCLE",
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ParentNotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::Password(PasswordError::Hash(_)) => {
                Self::Internal(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Rejects blank names and returns the trimmed form.
///
/// # Errors
///
/// Returns `EmptyName` for empty or whitespace-only input.
pub fn normalize_name(name: &str) -> Result<String, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyName);
    }
    Ok(trimmed.to_string())
}
