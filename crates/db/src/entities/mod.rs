//! `SeaORM` entity definitions.
//!
//! One module per table. Column docs live on the migration.

#![allow(missing_docs)]

pub mod accounts;
pub mod business_directions;
pub mod expense_categories;
pub mod income_categories;
pub mod planned_transactions;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
