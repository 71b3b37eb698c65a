//! Planning error types.

use thiserror::Error;
use uuid::Uuid;

use tally_shared::AppError;

use crate::ledger::LedgerError;

/// Errors raised while creating or completing planned transactions.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// Plan not found.
    #[error("Planned transaction not found: {0}")]
    PlanNotFound(Uuid),

    /// Plan was already completed and the policy forbids repeating it.
    #[error("Planned transaction {plan_id} is already completed")]
    AlreadyCompleted {
        /// The plan.
        plan_id: Uuid,
        /// Transaction produced by the earlier completion.
        transaction_id: Option<Uuid>,
    },

    /// Unrecognized recurrence pattern.
    #[error("Invalid recurrence pattern: {0}")]
    InvalidRecurrencePattern(String),

    /// Posting rule violated by the plan's fields.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl PlanningError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PlanNotFound(_) => "PLANNED_TRANSACTION_NOT_FOUND",
            Self::AlreadyCompleted { .. } => "PLAN_ALREADY_COMPLETED",
            Self::InvalidRecurrencePattern(_) => "INVALID_RECURRENCE_PATTERN",
            Self::Ledger(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::PlanNotFound(_) => 404,
            Self::AlreadyCompleted { .. } => 409,
            Self::InvalidRecurrencePattern(_) => 400,
            Self::Ledger(e) => e.http_status_code(),
        }
    }
}

impl From<PlanningError> for AppError {
    fn from(err: PlanningError) -> Self {
        match err {
            PlanningError::PlanNotFound(_) => Self::NotFound(err.to_string()),
            PlanningError::AlreadyCompleted { .. } => Self::Conflict(err.to_string()),
            PlanningError::InvalidRecurrencePattern(_) => Self::Validation(err.to_string()),
            PlanningError::Ledger(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_completed_is_conflict() {
        let err = PlanningError::AlreadyCompleted {
            plan_id: Uuid::nil(),
            transaction_id: None,
        };
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "PLAN_ALREADY_COMPLETED");
        assert!(matches!(AppError::from(err), AppError::Conflict(_)));
    }

    #[test]
    fn test_ledger_errors_pass_through() {
        let err = PlanningError::from(LedgerError::AccountNotFound(Uuid::nil()));
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "ACCOUNT_NOT_FOUND");
        assert!(matches!(AppError::from(err), AppError::NotFound(_)));
    }
}
