//! Property-based tests for LedgerService.
//!
//! - Income raises the destination by exactly the amount
//! - Expense lowers the source by exactly the amount
//! - A two-sided transfer conserves the combined balance

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use super::balance::AccountBalance;
use super::service::LedgerService;
use super::types::TransactionKind;

/// Strategy to generate positive decimal amounts (0.01 to 10,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate opening balances, including overdrawn ones.
fn opening_balance() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_income_adds_exact_amount(
        before in opening_balance(),
        amount in positive_amount(),
    ) {
        let account = AccountId::new();
        let mut balance = AccountBalance::opened(account, before);
        for adjustment in LedgerService::balance_adjustments(
            TransactionKind::Income, amount, None, Some(account),
        ) {
            balance.apply(&adjustment);
        }
        prop_assert_eq!(balance.current_balance, before + amount);
    }

    #[test]
    fn prop_expense_subtracts_exact_amount(
        before in opening_balance(),
        amount in positive_amount(),
    ) {
        let account = AccountId::new();
        let mut balance = AccountBalance::opened(account, before);
        for adjustment in LedgerService::balance_adjustments(
            TransactionKind::Expense, amount, Some(account), None,
        ) {
            balance.apply(&adjustment);
        }
        prop_assert_eq!(balance.current_balance, before - amount);
    }

    #[test]
    fn prop_transfer_conserves_combined_balance(
        debtor_before in opening_balance(),
        creditor_before in opening_balance(),
        amount in positive_amount(),
    ) {
        let debtor = AccountId::new();
        let creditor = AccountId::new();
        let mut from = AccountBalance::opened(debtor, debtor_before);
        let mut to = AccountBalance::opened(creditor, creditor_before);

        for adjustment in LedgerService::balance_adjustments(
            TransactionKind::Transfer, amount, Some(debtor), Some(creditor),
        ) {
            from.apply(&adjustment);
            to.apply(&adjustment);
        }

        prop_assert_eq!(from.current_balance, debtor_before - amount);
        prop_assert_eq!(to.current_balance, creditor_before + amount);
        prop_assert_eq!(
            from.current_balance + to.current_balance,
            debtor_before + creditor_before
        );
    }

    #[test]
    fn prop_validated_amount_preserves_value(amount in positive_amount()) {
        let validated = LedgerService::validate_amount(amount).unwrap();
        prop_assert_eq!(validated, amount);
        prop_assert_eq!(validated.scale(), 2);
    }

    #[test]
    fn prop_adjustments_never_exceed_two(
        amount in positive_amount(),
        kind in prop_oneof![
            Just(TransactionKind::Income),
            Just(TransactionKind::Expense),
            Just(TransactionKind::Transfer),
        ],
        has_from in any::<bool>(),
        has_to in any::<bool>(),
    ) {
        let from = has_from.then(AccountId::new);
        let to = has_to.then(AccountId::new);
        let adjustments = LedgerService::balance_adjustments(kind, amount, from, to);
        prop_assert!(adjustments.len() <= 2);
        prop_assert!(adjustments.iter().all(|a| a.amount == amount));
    }
}
