//! Initial schema.
//!
//! Creates:
//! - users
//! - accounts (balances as NUMERIC(15,2))
//! - income_categories / expense_categories (self-referencing trees)
//! - business_directions
//! - transactions
//! - planned_transactions

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(80)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Accounts::AccountType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Accounts::InitialBalance)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::CurrentBalance)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::Currency)
                            .string_len(3)
                            .not_null()
                            .default("RUB"),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(category_table(IncomeCategories::Table, "fk_income_categories_parent"))
            .await?;
        manager
            .create_table(category_table(
                ExpenseCategories::Table,
                "fk_expense_categories_parent",
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessDirections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessDirections::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BusinessDirections::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BusinessDirections::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(BusinessDirections::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        let mut transactions = Table::create();
        transactions
            .table(Transactions::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Transactions::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Transactions::TransactionDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            );
        add_posting_columns(&mut transactions, Transactions::Table, "transactions");
        manager.create_table(transactions.to_owned()).await?;

        let mut planned = Table::create();
        planned
            .table(PlannedTransactions::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(PlannedTransactions::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(PlannedTransactions::PlannedDate)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(PlannedTransactions::IsRecurring)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(PlannedTransactions::RecurrencePattern)
                    .string_len(20)
                    .null(),
            )
            .col(
                ColumnDef::new(PlannedTransactions::IsCompleted)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(PlannedTransactions::CompletedTransactionId)
                    .uuid()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_planned_transactions_completed")
                    .from(
                        PlannedTransactions::Table,
                        PlannedTransactions::CompletedTransactionId,
                    )
                    .to(Transactions::Table, Transactions::Id),
            );
        add_posting_columns(&mut planned, PlannedTransactions::Table, "planned_transactions");
        manager.create_table(planned.to_owned()).await?;

        // Scoped listings and report scans filter by owner and date
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_user_date")
                    .table(Transactions::Table)
                    .col(Posting::UserId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_date")
                    .table(Transactions::Table)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_planned_transactions_user_date")
                    .table(PlannedTransactions::Table)
                    .col(Posting::UserId)
                    .col(PlannedTransactions::PlannedDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlannedTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BusinessDirections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IncomeCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

/// Income and expense categories share one shape.
fn category_table<T>(table: T, parent_fk: &str) -> TableCreateStatement
where
    T: IntoIden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(Category::Id).uuid().not_null().primary_key())
        .col(ColumnDef::new(Category::Name).string_len(100).not_null())
        .col(ColumnDef::new(Category::ParentId).uuid().null())
        .col(
            ColumnDef::new(Category::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Category::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name(parent_fk)
                .from(table, Category::ParentId)
                .to(table, Category::Id),
        )
        .to_owned()
}

/// Columns shared by posted and planned transactions.
fn add_posting_columns<T>(stmt: &mut TableCreateStatement, table: T, prefix: &str)
where
    T: IntoIden + Copy + 'static,
{
    stmt.col(
        ColumnDef::new(Posting::TransactionType)
            .string_len(20)
            .not_null(),
    )
    .col(ColumnDef::new(Posting::Amount).decimal_len(15, 2).not_null())
    .col(ColumnDef::new(Posting::Description).text().null())
    .col(
        ColumnDef::new(Posting::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp()),
    )
    .col(ColumnDef::new(Posting::UserId).uuid().not_null())
    .col(ColumnDef::new(Posting::FromAccountId).uuid().null())
    .col(ColumnDef::new(Posting::ToAccountId).uuid().null())
    .col(ColumnDef::new(Posting::IncomeCategoryId).uuid().null())
    .col(ColumnDef::new(Posting::ExpenseCategoryId).uuid().null())
    .col(ColumnDef::new(Posting::BusinessDirectionId).uuid().null())
    .foreign_key(
        ForeignKey::create()
            .name(format!("fk_{prefix}_user"))
            .from(table, Posting::UserId)
            .to(Users::Table, Users::Id),
    )
    .foreign_key(
        ForeignKey::create()
            .name(format!("fk_{prefix}_from_account"))
            .from(table, Posting::FromAccountId)
            .to(Accounts::Table, Accounts::Id),
    )
    .foreign_key(
        ForeignKey::create()
            .name(format!("fk_{prefix}_to_account"))
            .from(table, Posting::ToAccountId)
            .to(Accounts::Table, Accounts::Id),
    )
    .foreign_key(
        ForeignKey::create()
            .name(format!("fk_{prefix}_income_category"))
            .from(table, Posting::IncomeCategoryId)
            .to(IncomeCategories::Table, Category::Id),
    )
    .foreign_key(
        ForeignKey::create()
            .name(format!("fk_{prefix}_expense_category"))
            .from(table, Posting::ExpenseCategoryId)
            .to(ExpenseCategories::Table, Category::Id),
    )
    .foreign_key(
        ForeignKey::create()
            .name(format!("fk_{prefix}_business_direction"))
            .from(table, Posting::BusinessDirectionId)
            .to(BusinessDirections::Table, BusinessDirections::Id),
    );
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Name,
    AccountType,
    InitialBalance,
    CurrentBalance,
    Currency,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum IncomeCategories {
    Table,
}

#[derive(DeriveIden, Clone, Copy)]
enum ExpenseCategories {
    Table,
}

#[derive(DeriveIden)]
enum Category {
    Id,
    Name,
    ParentId,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BusinessDirections {
    Table,
    Id,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Transactions {
    Table,
    Id,
    TransactionDate,
}

#[derive(DeriveIden, Clone, Copy)]
enum PlannedTransactions {
    Table,
    Id,
    PlannedDate,
    IsRecurring,
    RecurrencePattern,
    IsCompleted,
    CompletedTransactionId,
}

#[derive(DeriveIden)]
enum Posting {
    TransactionType,
    Amount,
    Description,
    CreatedAt,
    UserId,
    FromAccountId,
    ToAccountId,
    IncomeCategoryId,
    ExpenseCategoryId,
    BusinessDirectionId,
}
