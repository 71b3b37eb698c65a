//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod balance;
pub mod business_direction;
pub mod category;
pub mod planned_transaction;
pub mod report;
pub mod transaction;
pub mod user;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use balance::BalanceUpdater;
pub use business_direction::{BusinessDirectionError, BusinessDirectionRepository};
pub use category::{
    CategoryError, CreateCategoryInput, ExpenseCategoryRepository, IncomeCategoryRepository,
    UpdateCategoryInput,
};
pub use planned_transaction::{
    CompletedPlan, PlannedTransactionError, PlannedTransactionRepository,
};
pub use report::{ReportQueryError, ReportRepository};
pub use transaction::{TransactionError, TransactionFilter, TransactionRepository};
pub use user::{CreateUserInput, UserError, UserRepository, scope_for};
