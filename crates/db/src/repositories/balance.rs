//! Balance updater.
//!
//! The only code that writes `accounts.current_balance` after creation.
//! Runs on whatever connection it is given, so callers pass their open
//! database transaction and the update commits or rolls back with it.

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, sea_query::Expr};
use tally_core::ledger::{BalanceAdjustment, BalanceDirection};
use tracing::{debug, warn};

use crate::entities::accounts;

/// Applies balance adjustments in the store.
pub struct BalanceUpdater;

impl BalanceUpdater {
    /// Applies one adjustment as `current_balance = current_balance ± amount`.
    ///
    /// The arithmetic happens in the `UPDATE` itself, so concurrent posts to
    /// the same row are serialized by the store instead of overwriting each
    /// other. An unknown account is left alone with a warning.
    ///
    /// Returns whether an account row was changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn adjust<C>(conn: &C, adjustment: &BalanceAdjustment) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let account_id = adjustment.account_id.into_inner();
        let current = Expr::col(accounts::Column::CurrentBalance);
        let updated = match adjustment.direction {
            BalanceDirection::Increase => current.add(adjustment.amount),
            BalanceDirection::Decrease => current.sub(adjustment.amount),
        };

        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::CurrentBalance, updated)
            .filter(accounts::Column::Id.eq(account_id))
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            warn!(
                account_id = %account_id,
                amount = %adjustment.amount,
                "Balance adjustment skipped: account not found"
            );
            return Ok(false);
        }

        debug!(
            account_id = %account_id,
            signed_amount = %adjustment.signed_amount(),
            "Balance adjusted"
        );
        Ok(true)
    }

    /// Applies adjustments in order.
    ///
    /// # Errors
    ///
    /// Returns the first update failure.
    pub async fn apply_all<C>(conn: &C, adjustments: &[BalanceAdjustment]) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        for adjustment in adjustments {
            Self::adjust(conn, adjustment).await?;
        }
        Ok(())
    }
}
