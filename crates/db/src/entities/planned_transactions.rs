//! `SeaORM` Entity for planned_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{RecurrencePattern, TransactionType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "planned_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_type: TransactionType,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    #[serde(serialize_with = "tally_shared::types::serialize_amount")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub planned_date: DateTimeWithTimeZone,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub is_completed: bool,
    pub completed_transaction_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub user_id: Uuid,
    pub from_account_id: Option<Uuid>,
    pub to_account_id: Option<Uuid>,
    pub income_category_id: Option<Uuid>,
    pub expense_category_id: Option<Uuid>,
    pub business_direction_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::CompletedTransactionId",
        to = "super::transactions::Column::Id"
    )]
    CompletedTransaction,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompletedTransaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
