//! Report data types.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::ledger::TransactionKind;

/// Which end of a range a date-only bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    /// A bare date means the first instant of that day.
    Start,
    /// A bare date means the last instant of that day.
    End,
}

/// Offset-less ISO datetimes, as sent by `datetime-local` inputs. Read as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a range bound.
///
/// Accepts an RFC 3339 timestamp, a naive ISO datetime (taken as UTC) or a
/// bare `YYYY-MM-DD`, which `side` widens to the start or end of that day.
///
/// # Errors
///
/// Returns `InvalidDate` when no form matches.
pub fn parse_bound(raw: &str, side: BoundSide) -> Result<DateTime<Utc>, ReportError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(naive.and_utc());
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ReportError::InvalidDate(raw.to_string()))?;
    let time = match side {
        BoundSide::Start => NaiveTime::MIN,
        BoundSide::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
            .ok_or_else(|| ReportError::InvalidDate(raw.to_string()))?,
    };
    Ok(date.and_time(time).and_utc())
}

/// Inclusive date range of a report. Missing bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First included instant.
    pub start_date: Option<DateTime<Utc>>,
    /// Last included instant.
    pub end_date: Option<DateTime<Utc>>,
}

impl ReportPeriod {
    /// Builds a period from explicit bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `start` is after `end`.
    pub fn new(
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Self, ReportError> {
        if let (Some(start), Some(end)) = (start_date, end_date)
            && start > end
        {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Builds a period from raw query-string bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDate` or `InvalidDateRange`.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ReportError> {
        let start_date = start
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound(s, BoundSide::Start))
            .transpose()?;
        let end_date = end
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound(s, BoundSide::End))
            .transpose()?;
        Self::new(start_date, end_date)
    }

    /// Returns true if `ts` falls inside the period, bounds included.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start_date.is_none_or(|start| ts >= start) && self.end_date.is_none_or(|end| ts <= end)
    }
}

/// One transaction as the aggregator sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Transaction kind.
    pub kind: TransactionKind,
    /// Amount.
    pub amount: Decimal,
    /// Business date.
    pub transaction_date: DateTime<Utc>,
    /// Name of the linked category on the entry's own side (income category
    /// for income, expense category for expense).
    pub category_name: Option<String>,
}

/// Cash-flow summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowReport {
    /// Sum of income transactions.
    pub total_income: Decimal,
    /// Sum of expense transactions.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub net_flow: Decimal,
    /// Covered period.
    pub period: ReportPeriod,
}

/// Profit and loss by category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLossReport {
    /// Income totals keyed by income category name.
    pub income_by_category: BTreeMap<String, Decimal>,
    /// Expense totals keyed by expense category name.
    pub expense_by_category: BTreeMap<String, Decimal>,
    /// Sum of `income_by_category`.
    pub total_income: Decimal,
    /// Sum of `expense_by_category`.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub net_profit: Decimal,
    /// Covered period.
    pub period: ReportPeriod,
}
