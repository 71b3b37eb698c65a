//! Account repository: money accounts and their balances.
//!
//! `current_balance` is written here only once, on creation. Every later
//! change goes through [`super::balance::BalanceUpdater`].

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tally_core::catalog::{AccountKind, CatalogError, normalize_name};
use tally_core::ledger::{AccountBalance, LedgerError, LedgerService, Reconciliation};
use tally_shared::AppError;
use tally_shared::types::{AccountId, CurrencyCode, MONEY_SCALE, Money};
use tracing::{info, warn};
use uuid::Uuid;

use super::transaction::posting_from_model;
use crate::entities::{accounts, transactions};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Invalid name or account type.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Opening balance does not fit the stored precision.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self::NotFound(err.to_string()),
            AccountError::Catalog(e) => e.into(),
            AccountError::Ledger(e) => e.into(),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Opening balance; may be negative for overdrawn accounts.
    pub initial_balance: Decimal,
    /// Currency label.
    pub currency: CurrencyCode,
}

/// Input for updating an account. Balances and currency are not editable.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<AccountKind>,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens an account with `current_balance = initial_balance`.
    ///
    /// # Errors
    ///
    /// - `Catalog` for an empty name
    /// - `Ledger` if the opening balance has more than two fractional digits
    pub async fn create(&self, input: CreateAccountInput) -> Result<accounts::Model, AccountError> {
        let name = normalize_name(&input.name)?;
        if !Money::fits_scale(input.initial_balance) {
            return Err(LedgerError::ExcessPrecision(input.initial_balance).into());
        }
        let mut opening = input.initial_balance.normalize();
        opening.rescale(MONEY_SCALE);

        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            name: Set(name),
            account_type: Set(input.kind.into()),
            initial_balance: Set(opening),
            current_balance: Set(opening),
            currency: Set(input.currency.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(
            account_id = %account.id,
            kind = %input.kind,
            initial_balance = %account.initial_balance,
            "Account created"
        );
        Ok(account)
    }

    /// Lists active accounts by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<accounts::Model>, AccountError> {
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?;

        Ok(accounts)
    }

    /// Gets an account, active or not.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn get(&self, id: AccountId) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id.into_inner()))
    }

    /// Finds an active account by exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<accounts::Model>, AccountError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Name.eq(name))
            .filter(accounts::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        Ok(account)
    }

    /// Renames an account or changes its kind.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Catalog` for an empty name.
    pub async fn update(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.get(id).await?;

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(normalize_name(&name)?);
        }
        if let Some(kind) = input.kind {
            active.account_type = Set(kind.into());
        }

        let updated = active.update(&self.db).await?;
        info!(account_id = %updated.id, "Account updated");
        Ok(updated)
    }

    /// Soft-deletes an account. History and balance are kept.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn deactivate(&self, id: AccountId) -> Result<accounts::Model, AccountError> {
        let account = self.get(id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);

        let updated = active.update(&self.db).await?;
        info!(account_id = %updated.id, "Account deactivated");
        Ok(updated)
    }

    /// Replays every transaction touching the account and compares the
    /// result with the stored balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a database error.
    pub async fn reconcile(&self, id: AccountId) -> Result<Reconciliation, AccountError> {
        let account = self.get(id).await?;

        let history = transactions::Entity::find()
            .filter(
                Condition::any()
                    .add(transactions::Column::FromAccountId.eq(account.id))
                    .add(transactions::Column::ToAccountId.eq(account.id)),
            )
            .order_by_asc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let adjustments: Vec<_> = history
            .iter()
            .map(posting_from_model)
            .flat_map(|posting| {
                LedgerService::balance_adjustments(
                    posting.kind,
                    posting.amount,
                    posting.from_account_id,
                    posting.to_account_id,
                )
            })
            .collect();

        let stored = AccountBalance {
            account_id: id,
            initial_balance: account.initial_balance,
            current_balance: account.current_balance,
        };
        let reconciliation = Reconciliation::check(&stored, &adjustments);

        if !reconciliation.is_consistent() {
            warn!(
                account_id = %account.id,
                drift = %reconciliation.drift,
                "Account balance drifted from its history"
            );
        }

        Ok(reconciliation)
    }
}
