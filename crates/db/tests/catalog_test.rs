//! Integration tests for accounts, users, categories and directions.

mod common;

use rust_decimal_macros::dec;
use tally_core::catalog::{AccountKind, CatalogError, UserRole, UserScope};
use tally_db::repositories::{
    AccountError, AccountRepository, BusinessDirectionRepository, CategoryError,
    CreateCategoryInput, CreateUserInput, ExpenseCategoryRepository, IncomeCategoryRepository,
    UpdateAccountInput, UpdateCategoryInput, UserError, UserRepository, scope_for,
};
use tally_shared::AppError;
use tally_shared::types::{ExpenseCategoryId, IncomeCategoryId, UserId};

use common::{account_id, create_account, create_user, setup};

// ============================================================================
// Accounts
// ============================================================================
#[tokio::test]
async fn test_account_opens_at_initial_balance() {
    let db = setup().await;
    let account = create_account(&db, "Corporate card", AccountKind::Card, dec!(75000)).await;

    assert_eq!(account.initial_balance, dec!(75000));
    assert_eq!(account.current_balance, dec!(75000));
    assert_eq!(account.currency, "RUB");
    assert!(account.is_active);
}

#[tokio::test]
async fn test_account_rejects_sub_cent_opening_balance() {
    let db = setup().await;
    let result = AccountRepository::new(db.clone())
        .create(tally_db::repositories::CreateAccountInput {
            name: "A".to_string(),
            kind: AccountKind::Cash,
            initial_balance: dec!(10.005),
            currency: "RUB".parse().unwrap(),
        })
        .await;

    assert!(matches!(result, Err(AccountError::Ledger(_))));
}

#[tokio::test]
async fn test_account_update_and_deactivate() {
    let db = setup().await;
    let account = create_account(&db, "Cash desk", AccountKind::Cash, dec!(50000)).await;
    let repo = AccountRepository::new(db.clone());

    let updated = repo
        .update(
            account_id(&account),
            UpdateAccountInput {
                name: Some("  Main cash desk ".to_string()),
                kind: Some(AccountKind::Other),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Main cash desk");
    assert_eq!(updated.current_balance, dec!(50000));

    repo.deactivate(account_id(&account)).await.unwrap();
    assert!(repo.list_active().await.unwrap().is_empty());
    assert!(!repo.get(account_id(&account)).await.unwrap().is_active);
}

#[tokio::test]
async fn test_account_update_rejects_blank_name() {
    let db = setup().await;
    let account = create_account(&db, "A", AccountKind::Cash, dec!(0)).await;

    let result = AccountRepository::new(db.clone())
        .update(
            account_id(&account),
            UpdateAccountInput {
                name: Some("   ".to_string()),
                kind: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AccountError::Catalog(CatalogError::EmptyName))));
}

// ============================================================================
// Users
// ============================================================================
#[tokio::test]
async fn test_user_password_is_hashed() {
    let db = setup().await;
    let user = create_user(&db, "alice", UserRole::Manager).await;

    assert!(user.password_hash.starts_with("$argon2id$"));
    assert_eq!(scope_for(&user), UserScope::Owner(UserId::from(user.id)));
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let db = setup().await;
    create_user(&db, "alice", UserRole::Admin).await;

    let result = UserRepository::new(db.clone())
        .create(CreateUserInput {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
            password: "long enough".to_string(),
            role: UserRole::Manager,
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, UserError::DuplicateUsername(_)));
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_short_password_rejected() {
    let db = setup().await;
    let result = UserRepository::new(db.clone())
        .create(CreateUserInput {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "short".to_string(),
            role: UserRole::Manager,
        })
        .await;

    assert!(matches!(result, Err(UserError::Catalog(CatalogError::Password(_)))));
}

// ============================================================================
// Categories
// ============================================================================
#[tokio::test]
async fn test_category_with_missing_parent_rejected() {
    let db = setup().await;
    let result = IncomeCategoryRepository::new(db.clone())
        .create(CreateCategoryInput {
            name: "Revenue".to_string(),
            parent_id: Some(IncomeCategoryId::new()),
        })
        .await;

    assert!(matches!(
        result,
        Err(CategoryError::Catalog(CatalogError::ParentNotFound(_)))
    ));
}

#[tokio::test]
async fn test_category_reparent_cycle_rejected() {
    let db = setup().await;
    let repo = ExpenseCategoryRepository::new(db.clone());

    let root = repo
        .create(CreateCategoryInput {
            name: "Operations".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();
    let child = repo
        .create(CreateCategoryInput {
            name: "Rent".to_string(),
            parent_id: Some(ExpenseCategoryId::from(root.id)),
        })
        .await
        .unwrap();

    let result = repo
        .update(
            ExpenseCategoryId::from(root.id),
            UpdateCategoryInput {
                name: None,
                parent_id: Some(Some(ExpenseCategoryId::from(child.id))),
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(CategoryError::Catalog(CatalogError::CategoryCycle { .. }))
    ));

    let detached = repo
        .update(
            ExpenseCategoryId::from(child.id),
            UpdateCategoryInput {
                name: Some("Office rent".to_string()),
                parent_id: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(detached.parent_id, None);
    assert_eq!(detached.name, "Office rent");
}

#[tokio::test]
async fn test_category_kinds_are_separate_trees() {
    let db = setup().await;
    let income = IncomeCategoryRepository::new(db.clone())
        .create(CreateCategoryInput {
            name: "Revenue".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    let result = ExpenseCategoryRepository::new(db.clone())
        .create(CreateCategoryInput {
            name: "Materials".to_string(),
            parent_id: Some(ExpenseCategoryId::from(income.id)),
        })
        .await;

    assert!(matches!(
        result,
        Err(CategoryError::Catalog(CatalogError::ParentNotFound(_)))
    ));
}

// ============================================================================
// Business directions
// ============================================================================
#[tokio::test]
async fn test_business_directions() {
    let db = setup().await;
    let repo = BusinessDirectionRepository::new(db.clone());

    repo.create("Printing").await.unwrap();
    repo.create("Outdoor").await.unwrap();

    let names: Vec<_> = repo
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["Outdoor", "Printing"]);
    assert!(repo.find_by_name("Outdoor").await.unwrap().is_some());
    assert!(repo.create(" ").await.is_err());
}
