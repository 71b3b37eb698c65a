//! Account balance arithmetic.
//!
//! An account's current balance is its initial balance plus the signed sum
//! of every posted adjustment. The store maintains it incrementally; this
//! module replays the same arithmetic in memory to check the invariant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use super::types::BalanceAdjustment;

/// Balance state of a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Balance the account was opened with.
    pub initial_balance: Decimal,
    /// Balance after every applied adjustment.
    pub current_balance: Decimal,
}

impl AccountBalance {
    /// Creates a balance for a freshly opened account.
    #[must_use]
    pub const fn opened(account_id: AccountId, initial_balance: Decimal) -> Self {
        Self {
            account_id,
            initial_balance,
            current_balance: initial_balance,
        }
    }

    /// Applies an adjustment if it targets this account.
    ///
    /// Returns false and leaves the balance untouched otherwise.
    pub fn apply(&mut self, adjustment: &BalanceAdjustment) -> bool {
        if adjustment.account_id != self.account_id {
            return false;
        }
        self.current_balance = adjustment
            .direction
            .apply(self.current_balance, adjustment.amount);
        true
    }

    /// Rebuilds the balance from the opening amount and a full history.
    #[must_use]
    pub fn replay<'a>(
        account_id: AccountId,
        initial_balance: Decimal,
        history: impl IntoIterator<Item = &'a BalanceAdjustment>,
    ) -> Self {
        let mut balance = Self::opened(account_id, initial_balance);
        for adjustment in history {
            balance.apply(adjustment);
        }
        balance
    }

    /// Net movement since the account was opened.
    #[must_use]
    pub fn net_movement(&self) -> Decimal {
        self.current_balance - self.initial_balance
    }
}

/// Comparison between a stored balance and the balance replayed from history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// The account ID.
    pub account_id: AccountId,
    /// Balance held by the store.
    pub stored_balance: Decimal,
    /// Balance implied by the initial balance and posted transactions.
    pub expected_balance: Decimal,
    /// `stored_balance - expected_balance`.
    pub drift: Decimal,
}

impl Reconciliation {
    /// Compares a stored account balance against its replayed history.
    #[must_use]
    pub fn check<'a>(
        stored: &AccountBalance,
        history: impl IntoIterator<Item = &'a BalanceAdjustment>,
    ) -> Self {
        let expected = AccountBalance::replay(stored.account_id, stored.initial_balance, history);
        Self {
            account_id: stored.account_id,
            stored_balance: stored.current_balance,
            expected_balance: expected.current_balance,
            drift: stored.current_balance - expected.current_balance,
        }
    }

    /// Returns true when the stored balance matches the ledger exactly.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.drift.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::service::LedgerService;
    use crate::ledger::types::TransactionKind;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_ignores_other_accounts() {
        let mut balance = AccountBalance::opened(AccountId::new(), dec!(100));
        let applied = balance.apply(&BalanceAdjustment::increase(AccountId::new(), dec!(5)));
        assert!(!applied);
        assert_eq!(balance.current_balance, dec!(100));
    }

    /// Account A opens at 100000 and B at 50000; income, expense and a
    /// transfer land exactly.
    #[test]
    fn test_posting_scenario() {
        let a = AccountId::new();
        let b = AccountId::new();
        let mut balance_a = AccountBalance::opened(a, dec!(100000));
        let mut balance_b = AccountBalance::opened(b, dec!(50000));

        let postings = [
            LedgerService::balance_adjustments(TransactionKind::Income, dec!(5000), None, Some(a)),
            LedgerService::balance_adjustments(TransactionKind::Expense, dec!(2000), Some(a), None),
            LedgerService::balance_adjustments(
                TransactionKind::Transfer,
                dec!(1000),
                Some(a),
                Some(b),
            ),
        ];
        let expected_a = [dec!(105000), dec!(103000), dec!(102000)];

        for (adjustments, expected) in postings.iter().zip(expected_a) {
            for adjustment in adjustments {
                balance_a.apply(adjustment);
                balance_b.apply(adjustment);
            }
            assert_eq!(balance_a.current_balance, expected);
        }
        assert_eq!(balance_b.current_balance, dec!(51000));
    }

    #[test]
    fn test_reconciliation_detects_drift() {
        let account = AccountId::new();
        let history = [
            BalanceAdjustment::increase(account, dec!(10.50)),
            BalanceAdjustment::decrease(account, dec!(0.25)),
        ];
        let mut stored = AccountBalance::replay(account, dec!(100), &history);
        assert!(Reconciliation::check(&stored, &history).is_consistent());

        stored.current_balance += dec!(0.01);
        let report = Reconciliation::check(&stored, &history);
        assert_eq!(report.drift, dec!(0.01));
        assert_eq!(report.expected_balance, dec!(110.25));
        assert!(!report.is_consistent());
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The balance always equals the opening amount plus the signed sum
        /// of applied adjustments, with no rounding drift.
        #[test]
        fn prop_replay_matches_signed_sum(
            initial in amount_strategy(),
            changes in prop::collection::vec((amount_strategy(), any::<bool>()), 0..50),
        ) {
            let account = AccountId::new();
            let history: Vec<BalanceAdjustment> = changes
                .iter()
                .map(|(amount, up)| if *up {
                    BalanceAdjustment::increase(account, *amount)
                } else {
                    BalanceAdjustment::decrease(account, *amount)
                })
                .collect();

            let balance = AccountBalance::replay(account, initial, &history);
            let signed_sum: Decimal = history.iter().map(BalanceAdjustment::signed_amount).sum();

            prop_assert_eq!(balance.net_movement(), signed_sum);
            prop_assert_eq!(balance.current_balance, initial + signed_sum);
        }
    }
}
