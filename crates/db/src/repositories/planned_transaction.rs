//! Planned transaction repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait, sea_query::Expr,
};
use tally_core::catalog::UserScope;
use tally_core::ledger::LedgerError;
use tally_core::planning::{CompletionPolicy, CreatePlanInput, PlanSnapshot, PlanningError, PlanningService};
use tally_shared::AppError;
use tally_shared::types::{PlannedTransactionId, TransactionId};
use tracing::{info, warn};
use uuid::Uuid;

use super::balance::BalanceUpdater;
use super::transaction::{TransactionError, ensure_references, insert_posting};
use crate::entities::{planned_transactions, transactions};

/// Error types for planned transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum PlannedTransactionError {
    /// Plan lookup, completion or posting rule failure.
    #[error(transparent)]
    Planning(#[from] PlanningError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerError> for PlannedTransactionError {
    fn from(err: LedgerError) -> Self {
        Self::Planning(PlanningError::Ledger(err))
    }
}

impl From<TransactionError> for PlannedTransactionError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(id) => LedgerError::TransactionNotFound(id).into(),
            TransactionError::Ledger(e) => e.into(),
            TransactionError::Database(e) => Self::Database(e),
        }
    }
}

impl From<PlannedTransactionError> for AppError {
    fn from(err: PlannedTransactionError) -> Self {
        match err {
            PlannedTransactionError::Planning(e) => e.into(),
            PlannedTransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A completed plan with the transaction it produced.
#[derive(Debug, Clone)]
pub struct CompletedPlan {
    /// Plan after completion.
    pub plan: planned_transactions::Model,
    /// The new transaction.
    pub transaction: transactions::Model,
}

/// Planned transaction repository.
#[derive(Debug, Clone)]
pub struct PlannedTransactionRepository {
    db: DatabaseConnection,
}

impl PlannedTransactionRepository {
    /// Creates a new planned transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a plan after checking its amount and references.
    ///
    /// # Errors
    ///
    /// Returns `Planning` for an invalid amount or a missing referenced
    /// record, `Database` if the insert fails.
    pub async fn create(
        &self,
        input: CreatePlanInput,
    ) -> Result<planned_transactions::Model, PlannedTransactionError> {
        let amount = PlanningService::validate_plan(&input)?;

        let txn = self.db.begin().await?;
        ensure_references(&txn, &input.as_posting()).await?;

        let plan = planned_transactions::ActiveModel {
            id: Set(PlannedTransactionId::new().into_inner()),
            transaction_type: Set(input.kind.into()),
            amount: Set(amount),
            description: Set(input.description),
            planned_date: Set(input.planned_date.into()),
            is_recurring: Set(input.is_recurring),
            recurrence_pattern: Set(input.recurrence_pattern.map(Into::into)),
            is_completed: Set(false),
            completed_transaction_id: Set(None),
            created_at: Set(Utc::now().into()),
            user_id: Set(input.user_id.into_inner()),
            from_account_id: Set(input.from_account_id.map(Uuid::from)),
            to_account_id: Set(input.to_account_id.map(Uuid::from)),
            income_category_id: Set(input.income_category_id.map(Uuid::from)),
            expense_category_id: Set(input.expense_category_id.map(Uuid::from)),
            business_direction_id: Set(input.business_direction_id.map(Uuid::from)),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(plan_id = %plan.id, planned_date = %plan.planned_date, "Planned transaction created");
        Ok(plan)
    }

    /// Lists incomplete plans visible in `scope`, earliest planned date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_pending(
        &self,
        scope: UserScope,
    ) -> Result<Vec<planned_transactions::Model>, PlannedTransactionError> {
        let plans = scoped(planned_transactions::Entity::find(), scope)
            .filter(planned_transactions::Column::IsCompleted.eq(false))
            .order_by_asc(planned_transactions::Column::PlannedDate)
            .all(&self.db)
            .await?;

        Ok(plans)
    }

    /// Gets a plan visible in `scope`.
    ///
    /// # Errors
    ///
    /// Returns `PlanNotFound` if it does not exist or belongs to another user.
    pub async fn get(
        &self,
        scope: UserScope,
        id: PlannedTransactionId,
    ) -> Result<planned_transactions::Model, PlannedTransactionError> {
        scoped(planned_transactions::Entity::find_by_id(id.into_inner()), scope)
            .one(&self.db)
            .await?
            .ok_or_else(|| PlanningError::PlanNotFound(id.into_inner()).into())
    }

    /// Completes a plan.
    ///
    /// Inserts the realizing transaction, applies its balance effects and
    /// links the plan to it, all in one database transaction. Under
    /// [`CompletionPolicy::SingleShot`] the completion flag is flipped with a
    /// conditional update, so two racing completions cannot both succeed.
    ///
    /// # Errors
    ///
    /// - `PlanNotFound` if the plan is missing or outside `scope`
    /// - `AlreadyCompleted` if the policy forbids repeating it
    /// - `Ledger` errors from the posting checks
    /// - `Database` on write failure; nothing is persisted
    pub async fn complete(
        &self,
        scope: UserScope,
        id: PlannedTransactionId,
        policy: CompletionPolicy,
    ) -> Result<CompletedPlan, PlannedTransactionError> {
        let txn = self.db.begin().await?;

        let plan = scoped(planned_transactions::Entity::find_by_id(id.into_inner()), scope)
            .one(&txn)
            .await?
            .ok_or(PlanningError::PlanNotFound(id.into_inner()))?;

        let now = Utc::now();
        let completion = PlanningService::complete(&snapshot_from_model(&plan), policy, now)?;

        ensure_references(&txn, &completion.posting).await?;
        let transaction = insert_posting(&txn, &completion.posting, completion.amount, now).await?;
        BalanceUpdater::apply_all(&txn, &completion.adjustments).await?;

        let mut link = planned_transactions::Entity::update_many()
            .col_expr(planned_transactions::Column::IsCompleted, Expr::value(true))
            .col_expr(
                planned_transactions::Column::CompletedTransactionId,
                Expr::value(transaction.id),
            )
            .filter(planned_transactions::Column::Id.eq(plan.id));
        if policy == CompletionPolicy::SingleShot {
            link = link.filter(planned_transactions::Column::IsCompleted.eq(false));
        }
        if link.exec(&txn).await?.rows_affected == 0 {
            // Lost a race with another completion; dropping `txn` rolls back.
            return Err(PlanningError::AlreadyCompleted {
                plan_id: plan.id,
                transaction_id: None,
            }
            .into());
        }

        let plan = planned_transactions::Entity::find_by_id(plan.id)
            .one(&txn)
            .await?
            .ok_or(PlanningError::PlanNotFound(id.into_inner()))?;

        txn.commit().await?;

        if completion.is_repeat {
            warn!(
                plan_id = %plan.id,
                transaction_id = %transaction.id,
                "Planned transaction completed again"
            );
        } else {
            info!(
                plan_id = %plan.id,
                transaction_id = %transaction.id,
                "Planned transaction completed"
            );
        }

        Ok(CompletedPlan { plan, transaction })
    }
}

fn scoped(
    query: Select<planned_transactions::Entity>,
    scope: UserScope,
) -> Select<planned_transactions::Entity> {
    match scope.owner() {
        Some(owner) => query.filter(planned_transactions::Column::UserId.eq(owner.into_inner())),
        None => query,
    }
}

/// Reads a stored plan into the shape the completion rules take.
#[must_use]
pub fn snapshot_from_model(model: &planned_transactions::Model) -> PlanSnapshot {
    PlanSnapshot {
        id: model.id.into(),
        kind: model.transaction_type.into(),
        amount: model.amount,
        description: model.description.clone(),
        user_id: model.user_id.into(),
        from_account_id: model.from_account_id.map(Into::into),
        to_account_id: model.to_account_id.map(Into::into),
        income_category_id: model.income_category_id.map(Into::into),
        expense_category_id: model.expense_category_id.map(Into::into),
        business_direction_id: model.business_direction_id.map(Into::into),
        is_completed: model.is_completed,
        completed_transaction_id: model.completed_transaction_id.map(TransactionId::from),
    }
}
