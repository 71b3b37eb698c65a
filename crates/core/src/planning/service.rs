//! Plan completion rules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::PlanningError;
use super::types::{CompletionPolicy, CreatePlanInput, PlanCompletion, PlanSnapshot, PlanState};
use crate::ledger::{LedgerService, PostTransactionInput};

/// Stateless service deciding what creating or completing a plan writes.
pub struct PlanningService;

impl PlanningService {
    /// Validates a new plan and returns its amount scaled to two digits.
    ///
    /// # Errors
    ///
    /// Returns `PlanningError::Ledger` when the amount is not postable.
    pub fn validate_plan(input: &CreatePlanInput) -> Result<Decimal, PlanningError> {
        Ok(LedgerService::validate_amount(input.amount)?)
    }

    /// Turns a plan into the posting that realizes it.
    ///
    /// The posting copies the plan's kind, amount, description, owner,
    /// accounts, categories and direction. Its date is `now`, not the
    /// planned date.
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` when the plan is completed and `policy` is
    ///   [`CompletionPolicy::SingleShot`]
    /// - `Ledger` when the stored amount is not postable
    pub fn complete(
        plan: &PlanSnapshot,
        policy: CompletionPolicy,
        now: DateTime<Utc>,
    ) -> Result<PlanCompletion, PlanningError> {
        let is_repeat = plan.state() == PlanState::Completed;
        if is_repeat && policy == CompletionPolicy::SingleShot {
            return Err(PlanningError::AlreadyCompleted {
                plan_id: plan.id.into_inner(),
                transaction_id: plan.completed_transaction_id.map(Into::into),
            });
        }

        let posting = PostTransactionInput {
            kind: plan.kind,
            amount: plan.amount,
            description: plan.description.clone(),
            transaction_date: Some(now),
            user_id: plan.user_id,
            from_account_id: plan.from_account_id,
            to_account_id: plan.to_account_id,
            income_category_id: plan.income_category_id,
            expense_category_id: plan.expense_category_id,
            business_direction_id: plan.business_direction_id,
        };
        let (amount, adjustments) = LedgerService::prepare_posting(&posting)?;

        Ok(PlanCompletion {
            plan_id: plan.id,
            posting,
            amount,
            adjustments,
            is_repeat,
        })
    }
}
