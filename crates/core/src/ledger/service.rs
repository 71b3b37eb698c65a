//! Ledger service for posting validation and balance planning.
//!
//! This module decides what a posting does to account balances. It has no
//! database dependencies: the persistence layer asks it for the adjustments
//! and applies them inside its own write transaction.

use rust_decimal::Decimal;
use tally_shared::types::{AccountId, Money};

use super::error::LedgerError;
use super::types::{BalanceAdjustment, PostTransactionInput, TransactionKind};

/// Ledger service for transaction validation and balance planning.
pub struct LedgerService;

impl LedgerService {
    /// Validates a transaction amount.
    ///
    /// The amount must be strictly positive and representable with two
    /// fractional digits. The value is returned rescaled to two digits.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` or `ExcessPrecision`.
    pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        if !Money::fits_scale(amount) {
            return Err(LedgerError::ExcessPrecision(amount));
        }

        let mut normalized = amount.normalize();
        normalized.rescale(tally_shared::types::MONEY_SCALE);
        Ok(normalized)
    }

    /// Returns the balance adjustments a posting of `kind` causes.
    ///
    /// - Income: increase `to` when present.
    /// - Expense: decrease `from` when present.
    /// - Transfer: decrease `from` and increase `to`, each only when present.
    ///   A transfer missing one side behaves like a one-sided expense/income.
    #[must_use]
    pub fn balance_adjustments(
        kind: TransactionKind,
        amount: Decimal,
        from_account_id: Option<AccountId>,
        to_account_id: Option<AccountId>,
    ) -> Vec<BalanceAdjustment> {
        match kind {
            TransactionKind::Income => to_account_id
                .map(|to| BalanceAdjustment::increase(to, amount))
                .into_iter()
                .collect(),
            TransactionKind::Expense => from_account_id
                .map(|from| BalanceAdjustment::decrease(from, amount))
                .into_iter()
                .collect(),
            TransactionKind::Transfer => from_account_id
                .map(|from| BalanceAdjustment::decrease(from, amount))
                .into_iter()
                .chain(to_account_id.map(|to| BalanceAdjustment::increase(to, amount)))
                .collect(),
        }
    }

    /// Validates a posting and returns its balance adjustments.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the amount is invalid.
    pub fn prepare_posting(
        input: &PostTransactionInput,
    ) -> Result<(Decimal, Vec<BalanceAdjustment>), LedgerError> {
        let amount = Self::validate_amount(input.amount)?;
        let adjustments = Self::balance_adjustments(
            input.kind,
            amount,
            input.from_account_id,
            input.to_account_id,
        );

        Ok((amount, adjustments))
    }
}
