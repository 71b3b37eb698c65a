//! Database seeder for Tally development and testing.
//!
//! Seeds an admin user, three accounts, the default income and expense
//! categories and the business directions. Every record is looked up by
//! name first, so running the seeder twice changes nothing.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tally_core::catalog::{AccountKind, UserRole};
use tally_db::repositories::{
    AccountRepository, BusinessDirectionRepository, CreateAccountInput, CreateCategoryInput,
    CreateUserInput, ExpenseCategoryRepository, IncomeCategoryRepository, UserRepository,
};
use tally_shared::AppConfig;
use tally_shared::types::CurrencyCode;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@tally.local";
/// Used when `TALLY_SEED_ADMIN_PASSWORD` is not set.
const DEFAULT_ADMIN_PASSWORD: &str = "admin-password";

const ACCOUNTS: [(&str, AccountKind, i64); 3] = [
    ("Settlement account", AccountKind::BankAccount, 100_000),
    ("Cash desk", AccountKind::Cash, 50_000),
    ("Corporate card", AccountKind::Card, 75_000),
];

const INCOME_CATEGORIES: [&str; 3] = ["Revenue", "Owner contribution", "Other income"];

const EXPENSE_CATEGORIES: [&str; 5] = ["Materials", "Payroll", "Taxes", "Rent", "Advertising"];

const BUSINESS_DIRECTIONS: [&str; 7] = [
    "Outdoor",
    "Interior",
    "Printing",
    "Souvenirs",
    "Textile",
    "Stamps",
    "Services",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    println!("Connecting to database...");
    let db = tally_db::connect_with(&config.database).await?;

    println!("Seeding admin user...");
    seed_admin(&db).await?;

    println!("Seeding accounts...");
    seed_accounts(&db, &config.ledger.default_currency).await?;

    println!("Seeding categories...");
    seed_categories(&db).await?;

    println!("Seeding business directions...");
    seed_directions(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection) -> anyhow::Result<()> {
    let users = UserRepository::new(db.clone());
    if let Some(existing) = users.find_by_username(ADMIN_USERNAME).await? {
        println!("  Admin already exists ({}), skipping...", existing.id);
        return Ok(());
    }

    let password = std::env::var("TALLY_SEED_ADMIN_PASSWORD")
        .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
    let admin = users
        .create(CreateUserInput {
            username: ADMIN_USERNAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password,
            role: UserRole::Admin,
        })
        .await?;

    println!("  Created admin {}", admin.id);
    Ok(())
}

async fn seed_accounts(db: &DatabaseConnection, currency: &str) -> anyhow::Result<()> {
    let repo = AccountRepository::new(db.clone());
    let currency = CurrencyCode::from_str(currency).map_err(anyhow::Error::msg)?;

    for (name, kind, balance) in ACCOUNTS {
        if repo.find_by_name(name).await?.is_some() {
            println!("  Account '{name}' exists, skipping...");
            continue;
        }
        repo.create(CreateAccountInput {
            name: name.to_string(),
            kind,
            initial_balance: Decimal::from(balance),
            currency: currency.clone(),
        })
        .await?;
        println!("  Created account '{name}'");
    }
    Ok(())
}

async fn seed_categories(db: &DatabaseConnection) -> anyhow::Result<()> {
    let income = IncomeCategoryRepository::new(db.clone());
    for name in INCOME_CATEGORIES {
        if income.find_by_name(name).await?.is_none() {
            income
                .create(CreateCategoryInput {
                    name: name.to_string(),
                    parent_id: None,
                })
                .await?;
            println!("  Created income category '{name}'");
        }
    }

    let expense = ExpenseCategoryRepository::new(db.clone());
    for name in EXPENSE_CATEGORIES {
        if expense.find_by_name(name).await?.is_none() {
            expense
                .create(CreateCategoryInput {
                    name: name.to_string(),
                    parent_id: None,
                })
                .await?;
            println!("  Created expense category '{name}'");
        }
    }
    Ok(())
}

async fn seed_directions(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = BusinessDirectionRepository::new(db.clone());
    for name in BUSINESS_DIRECTIONS {
        if repo.find_by_name(name).await?.is_none() {
            repo.create(name).await?;
            println!("  Created business direction '{name}'");
        }
    }
    Ok(())
}
