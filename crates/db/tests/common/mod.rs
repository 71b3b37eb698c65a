//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database migrated with the real
//! `Migrator`.

#![allow(dead_code)]

use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tally_core::catalog::{AccountKind, UserRole};
use tally_db::entities::{accounts, users};
use tally_db::migration::Migrator;
use tally_db::repositories::{
    AccountRepository, CreateAccountInput, CreateUserInput, UserRepository,
};
use tally_shared::types::{AccountId, CurrencyCode, UserId};

pub async fn setup() -> DatabaseConnection {
    // One connection: every pooled connection would get its own memory db.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_user(db: &DatabaseConnection, username: &str, role: UserRole) -> users::Model {
    UserRepository::new(db.clone())
        .create(CreateUserInput {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "correct horse battery".to_string(),
            role,
        })
        .await
        .expect("Failed to create user")
}

pub async fn create_account(
    db: &DatabaseConnection,
    name: &str,
    kind: AccountKind,
    initial_balance: Decimal,
) -> accounts::Model {
    AccountRepository::new(db.clone())
        .create(CreateAccountInput {
            name: name.to_string(),
            kind,
            initial_balance,
            currency: CurrencyCode::from_str("RUB").unwrap(),
        })
        .await
        .expect("Failed to create account")
}

pub async fn balance_of(db: &DatabaseConnection, account: &accounts::Model) -> Decimal {
    AccountRepository::new(db.clone())
        .get(AccountId::from(account.id))
        .await
        .expect("Failed to load account")
        .current_balance
}

pub fn user_id(user: &users::Model) -> UserId {
    UserId::from(user.id)
}

pub fn account_id(account: &accounts::Model) -> AccountId {
    AccountId::from(account.id)
}
