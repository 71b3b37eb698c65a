//! Report aggregation service.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tally_shared::types::Money;

use super::types::{CashFlowReport, ProfitLossReport, ReportEntry, ReportPeriod};
use crate::ledger::TransactionKind;

/// Service for aggregating transactions into reports.
pub struct ReportService;

impl ReportService {
    /// Sums income and expense amounts inside `period`.
    ///
    /// Transfers count on neither side.
    #[must_use]
    pub fn cash_flow<'a>(
        period: ReportPeriod,
        entries: impl IntoIterator<Item = &'a ReportEntry>,
    ) -> CashFlowReport {
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;

        for entry in entries.into_iter().filter(|e| period.contains(e.transaction_date)) {
            match entry.kind {
                TransactionKind::Income => total_income += entry.amount,
                TransactionKind::Expense => total_expense += entry.amount,
                TransactionKind::Transfer => {}
            }
        }

        CashFlowReport {
            total_income: Money::scaled(total_income),
            total_expense: Money::scaled(total_expense),
            net_flow: Money::scaled(total_income - total_expense),
            period,
        }
    }

    /// Groups income and expense amounts inside `period` by category name.
    ///
    /// Entries with no linked category are left out.
    #[must_use]
    pub fn profit_loss<'a>(
        period: ReportPeriod,
        entries: impl IntoIterator<Item = &'a ReportEntry>,
    ) -> ProfitLossReport {
        let mut income_by_category: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut expense_by_category: BTreeMap<String, Decimal> = BTreeMap::new();

        for entry in entries.into_iter().filter(|e| period.contains(e.transaction_date)) {
            let Some(name) = entry.category_name.as_ref() else {
                continue;
            };
            let bucket = match entry.kind {
                TransactionKind::Income => &mut income_by_category,
                TransactionKind::Expense => &mut expense_by_category,
                TransactionKind::Transfer => continue,
            };
            *bucket.entry(name.clone()).or_default() += entry.amount;
        }

        let total_income: Decimal = income_by_category.values().sum();
        let total_expense: Decimal = expense_by_category.values().sum();

        for amount in income_by_category.values_mut().chain(expense_by_category.values_mut()) {
            *amount = Money::scaled(*amount);
        }

        ProfitLossReport {
            income_by_category,
            expense_by_category,
            total_income: Money::scaled(total_income),
            total_expense: Money::scaled(total_expense),
            net_profit: Money::scaled(total_income - total_expense),
            period,
        }
    }
}
