//! Report error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use tally_shared::AppError;

/// Errors that can occur while building a report period.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Date bound could not be parsed.
    #[error("Invalid date: {0} (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM[:SS] or RFC 3339)")]
    InvalidDate(String),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start bound.
        start: DateTime<Utc>,
        /// End bound.
        end: DateTime<Utc>,
    },
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::Validation(err.to_string())
    }
}
