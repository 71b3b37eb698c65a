//! Ledger error types for validation and lookup errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use tally_shared::AppError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Amount has more fractional digits than the ledger stores.
    #[error("Amount {0} has more than 2 fractional digits")]
    ExcessPrecision(Decimal),

    /// Unrecognized transaction type.
    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),

    // ========== Reference Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Income category not found.
    #[error("Income category not found: {0}")]
    IncomeCategoryNotFound(Uuid),

    /// Expense category not found.
    #[error("Expense category not found: {0}")]
    ExpenseCategoryNotFound(Uuid),

    /// Business direction not found.
    #[error("Business direction not found: {0}")]
    BusinessDirectionNotFound(Uuid),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::ExcessPrecision(_) => "EXCESS_PRECISION",
            Self::InvalidTransactionType(_) => "INVALID_TRANSACTION_TYPE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::IncomeCategoryNotFound(_) => "INCOME_CATEGORY_NOT_FOUND",
            Self::ExpenseCategoryNotFound(_) => "EXPENSE_CATEGORY_NOT_FOUND",
            Self::BusinessDirectionNotFound(_) => "BUSINESS_DIRECTION_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NonPositiveAmount(_)
            | Self::ExcessPrecision(_)
            | Self::InvalidTransactionType(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::UserNotFound(_)
            | Self::IncomeCategoryNotFound(_)
            | Self::ExpenseCategoryNotFound(_)
            | Self::BusinessDirectionNotFound(_)
            | Self::TransactionNotFound(_) => 404,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err.http_status_code() {
            404 => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
