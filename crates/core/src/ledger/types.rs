//! Ledger domain types for posting transactions.
//!
//! This module defines the closed set of transaction kinds, the direction of
//! a balance change, and the input accepted by the transaction poster.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{
    AccountId, BusinessDirectionId, ExpenseCategoryId, IncomeCategoryId, UserId,
};

use super::error::LedgerError;

/// Transaction type classification.
///
/// Determines which accounts a posting touches:
/// - `Income` credits the destination account
/// - `Expense` debits the source account
/// - `Transfer` moves money from the source to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money coming into the business.
    Income,
    /// Money leaving the business.
    Expense,
    /// Money moving between two of the business's own accounts.
    Transfer,
}

impl TransactionKind {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            _ => Err(LedgerError::InvalidTransactionType(s.to_string())),
        }
    }
}

/// Direction of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceDirection {
    /// Add the amount to the balance.
    Increase,
    /// Subtract the amount from the balance.
    Decrease,
}

impl BalanceDirection {
    /// Returns the amount with the sign this direction applies.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Increase => amount,
            Self::Decrease => -amount,
        }
    }

    /// Applies `amount` to `balance` in this direction.
    #[must_use]
    pub fn apply(self, balance: Decimal, amount: Decimal) -> Decimal {
        balance + self.signed(amount)
    }
}

/// A single balance change produced by a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    /// The account whose balance changes.
    pub account_id: AccountId,
    /// Increase or decrease.
    pub direction: BalanceDirection,
    /// Positive amount of the change.
    pub amount: Decimal,
}

impl BalanceAdjustment {
    /// Creates an increase of `amount` on `account_id`.
    #[must_use]
    pub const fn increase(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            direction: BalanceDirection::Increase,
            amount,
        }
    }

    /// Creates a decrease of `amount` on `account_id`.
    #[must_use]
    pub const fn decrease(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            direction: BalanceDirection::Decrease,
            amount,
        }
    }

    /// Returns the signed effect on the account balance.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.direction.signed(self.amount)
    }
}

/// Input for posting a new transaction.
///
/// Which of the optional account and category fields matter depends on the
/// kind; irrelevant ones are stored but have no balance effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTransactionInput {
    /// Kind of transaction.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Free-form description.
    pub description: Option<String>,
    /// Business date of the transaction; `None` means now.
    pub transaction_date: Option<DateTime<Utc>>,
    /// Owning user.
    pub user_id: UserId,
    /// Account money leaves (expense, transfer).
    pub from_account_id: Option<AccountId>,
    /// Account money arrives in (income, transfer).
    pub to_account_id: Option<AccountId>,
    /// Income category, if any.
    pub income_category_id: Option<IncomeCategoryId>,
    /// Expense category, if any.
    pub expense_category_id: Option<ExpenseCategoryId>,
    /// Business direction tag, if any.
    pub business_direction_id: Option<BusinessDirectionId>,
}

impl PostTransactionInput {
    /// Creates an input with only the required fields set.
    #[must_use]
    pub const fn new(kind: TransactionKind, amount: Decimal, user_id: UserId) -> Self {
        Self {
            kind,
            amount,
            description: None,
            transaction_date: None,
            user_id,
            from_account_id: None,
            to_account_id: None,
            income_category_id: None,
            expense_category_id: None,
            business_direction_id: None,
        }
    }

    /// Sets the source account.
    #[must_use]
    pub fn from_account(mut self, account_id: AccountId) -> Self {
        self.from_account_id = Some(account_id);
        self
    }

    /// Sets the destination account.
    #[must_use]
    pub fn to_account(mut self, account_id: AccountId) -> Self {
        self.to_account_id = Some(account_id);
        self
    }

    /// Returns every account id the input references, source first.
    #[must_use]
    pub fn referenced_accounts(&self) -> Vec<AccountId> {
        self.from_account_id
            .into_iter()
            .chain(self.to_account_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case("income", TransactionKind::Income)]
    #[case("EXPENSE", TransactionKind::Expense)]
    #[case(" transfer ", TransactionKind::Transfer)]
    fn test_kind_parses(#[case] raw: &str, #[case] expected: TransactionKind) {
        assert_eq!(TransactionKind::from_str(raw).unwrap(), expected);
    }

    #[test]
    fn test_kind_rejects_unknown() {
        assert!(matches!(
            TransactionKind::from_str("refund"),
            Err(LedgerError::InvalidTransactionType(s)) if s == "refund"
        ));
    }

    #[test]
    fn test_kind_round_trips_as_str() {
        for kind in [
            TransactionKind::Income,
            TransactionKind::Expense,
            TransactionKind::Transfer,
        ] {
            assert_eq!(TransactionKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(BalanceDirection::Increase.apply(dec!(100), dec!(5.25)), dec!(105.25));
        assert_eq!(BalanceDirection::Decrease.apply(dec!(100), dec!(5.25)), dec!(94.75));
    }

    #[test]
    fn test_adjustment_signed_amount() {
        let account = AccountId::new();
        assert_eq!(BalanceAdjustment::increase(account, dec!(10)).signed_amount(), dec!(10));
        assert_eq!(BalanceAdjustment::decrease(account, dec!(10)).signed_amount(), dec!(-10));
    }

    #[test]
    fn test_referenced_accounts_order() {
        let from = AccountId::new();
        let to = AccountId::new();
        let input = PostTransactionInput::new(TransactionKind::Transfer, dec!(1), UserId::new())
            .from_account(from)
            .to_account(to);
        assert_eq!(input.referenced_accounts(), vec![from, to]);

        let bare = PostTransactionInput::new(TransactionKind::Income, dec!(1), UserId::new());
        assert!(bare.referenced_accounts().is_empty());
    }
}
