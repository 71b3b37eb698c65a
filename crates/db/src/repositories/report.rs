//! Report repository: the scoped, date-filtered scan behind the reports.
//!
//! Aggregation itself is done by [`ReportService`] on the loaded entries.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tally_core::catalog::UserScope;
use tally_core::reports::{CashFlowReport, ProfitLossReport, ReportEntry, ReportPeriod, ReportService};
use tally_shared::AppError;
use uuid::Uuid;

use crate::entities::{
    expense_categories, income_categories, sea_orm_active_enums::TransactionType, transactions,
};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportQueryError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportQueryError> for AppError {
    fn from(err: ReportQueryError) -> Self {
        match err {
            ReportQueryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Cash-flow summary for `scope` over `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn cash_flow(
        &self,
        scope: UserScope,
        period: ReportPeriod,
    ) -> Result<CashFlowReport, ReportQueryError> {
        let entries = self.entries(scope, period).await?;
        Ok(ReportService::cash_flow(period, &entries))
    }

    /// Profit and loss by category name for `scope` over `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn profit_loss(
        &self,
        scope: UserScope,
        period: ReportPeriod,
    ) -> Result<ProfitLossReport, ReportQueryError> {
        let entries = self.entries(scope, period).await?;
        Ok(ReportService::profit_loss(period, &entries))
    }

    /// Loads income and expense transactions with their category names.
    async fn entries(
        &self,
        scope: UserScope,
        period: ReportPeriod,
    ) -> Result<Vec<ReportEntry>, ReportQueryError> {
        let mut query = transactions::Entity::find().filter(
            transactions::Column::TransactionType
                .is_in([TransactionType::Income, TransactionType::Expense]),
        );
        if let Some(owner) = scope.owner() {
            query = query.filter(transactions::Column::UserId.eq(owner.into_inner()));
        }
        if let Some(start) = period.start_date {
            query = query.filter(transactions::Column::TransactionDate.gte(start.fixed_offset()));
        }
        if let Some(end) = period.end_date {
            query = query.filter(transactions::Column::TransactionDate.lte(end.fixed_offset()));
        }
        let rows = query.all(&self.db).await?;

        let income_names: HashMap<Uuid, String> = income_categories::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let expense_names: HashMap<Uuid, String> = expense_categories::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let entries = rows
            .into_iter()
            .map(|row| {
                let category_name = match row.transaction_type {
                    TransactionType::Income => row
                        .income_category_id
                        .and_then(|id| income_names.get(&id).cloned()),
                    TransactionType::Expense => row
                        .expense_category_id
                        .and_then(|id| expense_names.get(&id).cloned()),
                    TransactionType::Transfer => None,
                };
                ReportEntry {
                    kind: row.transaction_type.into(),
                    amount: row.amount,
                    transaction_date: row.transaction_date.with_timezone(&Utc),
                    category_name,
                }
            })
            .collect();

        Ok(entries)
    }
}
