//! Transaction repository: posting and scoped reads.
//!
//! Posting inserts the transaction and applies its balance adjustments in
//! one database transaction. Reference checks run inside that transaction
//! too, so a posting never lands against a row that vanished in between.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use tally_core::catalog::UserScope;
use tally_core::ledger::{LedgerError, LedgerService, PostTransactionInput, TransactionKind};
use tally_core::reports::ReportPeriod;
use tally_shared::AppError;
use tally_shared::types::{AccountId, TransactionId};
use tracing::info;
use uuid::Uuid;

use super::balance::BalanceUpdater;
use crate::entities::{
    accounts, business_directions, expense_categories, income_categories,
    sea_orm_active_enums::TransactionType, transactions, users,
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found, or not visible to the caller.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Posting rule violated or referenced record missing.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) => Self::NotFound(err.to_string()),
            TransactionError::Ledger(e) => e.into(),
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Inclusive date range.
    pub period: ReportPeriod,
    /// Only this kind.
    pub kind: Option<TransactionKind>,
    /// Only transactions touching this account on either side.
    pub account_id: Option<AccountId>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a transaction and applies its balance effects atomically.
    ///
    /// # Errors
    ///
    /// - `Ledger` for an invalid amount or a missing referenced record
    /// - `Database` if any write or the commit fails; nothing is persisted
    pub async fn post(
        &self,
        input: PostTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let (amount, adjustments) = LedgerService::prepare_posting(&input)?;

        let txn = self.db.begin().await?;

        ensure_references(&txn, &input).await?;
        let transaction = insert_posting(&txn, &input, amount, Utc::now()).await?;
        BalanceUpdater::apply_all(&txn, &adjustments).await?;

        txn.commit().await?;

        info!(
            transaction_id = %transaction.id,
            kind = %input.kind,
            amount = %amount,
            adjustments = adjustments.len(),
            "Transaction posted"
        );

        Ok(transaction)
    }

    /// Lists transactions visible in `scope`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        scope: UserScope,
        filter: &TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = scoped(transactions::Entity::find(), scope);

        if let Some(start) = filter.period.start_date {
            query = query.filter(transactions::Column::TransactionDate.gte(start.fixed_offset()));
        }
        if let Some(end) = filter.period.end_date {
            query = query.filter(transactions::Column::TransactionDate.lte(end.fixed_offset()));
        }
        if let Some(kind) = filter.kind {
            query =
                query.filter(transactions::Column::TransactionType.eq(TransactionType::from(kind)));
        }
        if let Some(account_id) = filter.account_id {
            let account_id = account_id.into_inner();
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::FromAccountId.eq(account_id))
                    .add(transactions::Column::ToAccountId.eq(account_id)),
            );
        }

        let transactions = query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(transactions)
    }

    /// Gets a transaction visible in `scope`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist or belongs to another user.
    pub async fn get(
        &self,
        scope: UserScope,
        id: TransactionId,
    ) -> Result<transactions::Model, TransactionError> {
        scoped(transactions::Entity::find_by_id(id.into_inner()), scope)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id.into_inner()))
    }
}

/// Restricts a transaction query to the owner when the scope requires it.
fn scoped(query: Select<transactions::Entity>, scope: UserScope) -> Select<transactions::Entity> {
    match scope.owner() {
        Some(owner) => query.filter(transactions::Column::UserId.eq(owner.into_inner())),
        None => query,
    }
}

/// Checks that every record the posting references exists.
pub(crate) async fn ensure_references<C>(
    conn: &C,
    input: &PostTransactionInput,
) -> Result<(), TransactionError>
where
    C: ConnectionTrait,
{
    let user_id = input.user_id.into_inner();
    if users::Entity::find_by_id(user_id).one(conn).await?.is_none() {
        return Err(LedgerError::UserNotFound(user_id).into());
    }

    for account_id in input.referenced_accounts() {
        let account_id = account_id.into_inner();
        if accounts::Entity::find_by_id(account_id).one(conn).await?.is_none() {
            return Err(LedgerError::AccountNotFound(account_id).into());
        }
    }

    if let Some(id) = input.income_category_id.map(Uuid::from)
        && income_categories::Entity::find_by_id(id).one(conn).await?.is_none()
    {
        return Err(LedgerError::IncomeCategoryNotFound(id).into());
    }

    if let Some(id) = input.expense_category_id.map(Uuid::from)
        && expense_categories::Entity::find_by_id(id).one(conn).await?.is_none()
    {
        return Err(LedgerError::ExpenseCategoryNotFound(id).into());
    }

    if let Some(id) = input.business_direction_id.map(Uuid::from)
        && business_directions::Entity::find_by_id(id).one(conn).await?.is_none()
    {
        return Err(LedgerError::BusinessDirectionNotFound(id).into());
    }

    Ok(())
}

/// Inserts the transaction row. `now` stamps the creation time and fills
/// in a missing transaction date.
pub(crate) async fn insert_posting<C>(
    conn: &C,
    input: &PostTransactionInput,
    amount: rust_decimal::Decimal,
    now: DateTime<Utc>,
) -> Result<transactions::Model, DbErr>
where
    C: ConnectionTrait,
{
    let transaction = transactions::ActiveModel {
        id: Set(TransactionId::new().into_inner()),
        transaction_type: Set(input.kind.into()),
        amount: Set(amount),
        description: Set(input.description.clone()),
        transaction_date: Set(input.transaction_date.unwrap_or(now).into()),
        created_at: Set(now.into()),
        user_id: Set(input.user_id.into_inner()),
        from_account_id: Set(input.from_account_id.map(Uuid::from)),
        to_account_id: Set(input.to_account_id.map(Uuid::from)),
        income_category_id: Set(input.income_category_id.map(Uuid::from)),
        expense_category_id: Set(input.expense_category_id.map(Uuid::from)),
        business_direction_id: Set(input.business_direction_id.map(Uuid::from)),
    };

    transaction.insert(conn).await
}

/// Converts a stored row back into a posting, for replay.
#[must_use]
pub fn posting_from_model(model: &transactions::Model) -> PostTransactionInput {
    PostTransactionInput {
        kind: model.transaction_type.into(),
        amount: model.amount,
        description: model.description.clone(),
        transaction_date: Some(model.transaction_date.with_timezone(&Utc)),
        user_id: model.user_id.into(),
        from_account_id: model.from_account_id.map(Into::into),
        to_account_id: model.to_account_id.map(Into::into),
        income_category_id: model.income_category_id.map(Into::into),
        expense_category_id: model.expense_category_id.map(Into::into),
        business_direction_id: model.business_direction_id.map(Into::into),
    }
}
