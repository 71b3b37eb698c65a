//! Planned transaction domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{
    AccountId, BusinessDirectionId, ExpenseCategoryId, IncomeCategoryId, PlannedTransactionId,
    TransactionId, UserId,
};

use super::error::PlanningError;
use crate::ledger::{BalanceAdjustment, PostTransactionInput, TransactionKind};

/// How often a recurring plan repeats. Stored, never scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every month.
    Monthly,
    /// Every year.
    Yearly,
}

impl RecurrencePattern {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecurrencePattern {
    type Err = PlanningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(PlanningError::InvalidRecurrencePattern(s.to_string())),
        }
    }
}

/// What completing an already-completed plan does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// A plan completes exactly once; later attempts are conflicts.
    #[default]
    SingleShot,
    /// Every attempt posts another transaction and relinks the plan.
    AllowRepeat,
}

impl CompletionPolicy {
    /// Maps the `ledger.allow_plan_recompletion` setting to a policy.
    #[must_use]
    pub const fn from_allow_recompletion(allow: bool) -> Self {
        if allow { Self::AllowRepeat } else { Self::SingleShot }
    }
}

/// Lifecycle state of a plan. `Pending -> Completed` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanState {
    /// Not yet realized.
    Pending,
    /// Realized as a transaction.
    Completed,
}

/// Input for creating a planned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlanInput {
    /// Kind of the eventual transaction.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Free-form description.
    pub description: Option<String>,
    /// Target date.
    pub planned_date: DateTime<Utc>,
    /// Owning user.
    pub user_id: UserId,
    /// Source account.
    pub from_account_id: Option<AccountId>,
    /// Destination account.
    pub to_account_id: Option<AccountId>,
    /// Income category.
    pub income_category_id: Option<IncomeCategoryId>,
    /// Expense category.
    pub expense_category_id: Option<ExpenseCategoryId>,
    /// Business direction tag.
    pub business_direction_id: Option<BusinessDirectionId>,
    /// Whether the plan recurs.
    pub is_recurring: bool,
    /// Recurrence pattern, informational only.
    pub recurrence_pattern: Option<RecurrencePattern>,
}

impl CreatePlanInput {
    /// Returns the posting this plan would produce, minus its date.
    ///
    /// Used to run the same reference checks a direct posting gets.
    #[must_use]
    pub fn as_posting(&self) -> PostTransactionInput {
        PostTransactionInput {
            kind: self.kind,
            amount: self.amount,
            description: self.description.clone(),
            transaction_date: None,
            user_id: self.user_id,
            from_account_id: self.from_account_id,
            to_account_id: self.to_account_id,
            income_category_id: self.income_category_id,
            expense_category_id: self.expense_category_id,
            business_direction_id: self.business_direction_id,
        }
    }
}

/// A stored plan, as the completer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSnapshot {
    /// Plan id.
    pub id: PlannedTransactionId,
    /// Kind of the eventual transaction.
    pub kind: TransactionKind,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: Option<String>,
    /// Owning user.
    pub user_id: UserId,
    /// Source account.
    pub from_account_id: Option<AccountId>,
    /// Destination account.
    pub to_account_id: Option<AccountId>,
    /// Income category.
    pub income_category_id: Option<IncomeCategoryId>,
    /// Expense category.
    pub expense_category_id: Option<ExpenseCategoryId>,
    /// Business direction tag.
    pub business_direction_id: Option<BusinessDirectionId>,
    /// Completed flag.
    pub is_completed: bool,
    /// Transaction produced by the last completion.
    pub completed_transaction_id: Option<TransactionId>,
}

impl PlanSnapshot {
    /// Returns the lifecycle state.
    ///
    /// A set completion link counts as completed even if the flag was not
    /// written, so a half-written row can never be completed twice.
    #[must_use]
    pub const fn state(&self) -> PlanState {
        if self.is_completed || self.completed_transaction_id.is_some() {
            PlanState::Completed
        } else {
            PlanState::Pending
        }
    }
}

/// Everything the store needs to write when a plan is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCompletion {
    /// The plan being completed.
    pub plan_id: PlannedTransactionId,
    /// Transaction to insert; its date is the completion time.
    pub posting: PostTransactionInput,
    /// Validated amount, scaled to two digits.
    pub amount: Decimal,
    /// Balance changes to apply with the insert.
    pub adjustments: Vec<BalanceAdjustment>,
    /// True when this completion repeats an earlier one.
    pub is_repeat: bool,
}
