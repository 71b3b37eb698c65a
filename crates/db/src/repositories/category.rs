//! Income and expense category repositories.
//!
//! The two kinds live in separate tables with the same shape, so both
//! repositories come from one macro. Parent checks load the whole tree of
//! the kind inside the write transaction and run it through
//! [`CategoryTree`].

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tally_core::catalog::{CatalogError, CategoryTree, normalize_name};
use tally_shared::AppError;
use tally_shared::types::{ExpenseCategoryId, IncomeCategoryId};
use tracing::info;
use uuid::Uuid;

use crate::entities::{expense_categories, income_categories};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Blank name, missing parent or cycle.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => Self::NotFound(err.to_string()),
            CategoryError::Catalog(e) => e.into(),
            CategoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput<Id> {
    /// Display name; report groups use it.
    pub name: String,
    /// Parent in the same tree.
    pub parent_id: Option<Id>,
}

/// Input for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryInput<Id> {
    /// New name.
    pub name: Option<String>,
    /// `Some(None)` detaches the category to the root.
    pub parent_id: Option<Option<Id>>,
}

impl<Id> Default for UpdateCategoryInput<Id> {
    fn default() -> Self {
        Self {
            name: None,
            parent_id: None,
        }
    }
}

macro_rules! category_repository {
    ($repo:ident, $entity:ident, $id:ty, $label:literal) => {
        #[doc = concat!("Repository for ", $label, " categories.")]
        #[derive(Debug, Clone)]
        pub struct $repo {
            db: DatabaseConnection,
        }

        impl $repo {
            #[doc = concat!("Creates a new ", $label, " category repository.")]
            #[must_use]
            pub const fn new(db: DatabaseConnection) -> Self {
                Self { db }
            }

            /// Creates a category under an optional parent.
            ///
            /// # Errors
            ///
            /// Returns `Catalog` for a blank name or a missing parent.
            pub async fn create(
                &self,
                input: CreateCategoryInput<$id>,
            ) -> Result<$entity::Model, CategoryError> {
                let name = normalize_name(&input.name)?;
                let id = <$id>::new();

                let txn = self.db.begin().await?;
                let tree = load_tree!(&txn, $entity, $id);
                tree.validate_parent(id, input.parent_id)?;

                let category = $entity::ActiveModel {
                    id: Set(id.into_inner()),
                    name: Set(name),
                    parent_id: Set(input.parent_id.map(Uuid::from)),
                    is_active: Set(true),
                    created_at: Set(Utc::now().into()),
                }
                .insert(&txn)
                .await?;
                txn.commit().await?;

                info!(category_id = %category.id, kind = $label, "Category created");
                Ok(category)
            }

            /// Lists active categories by name.
            ///
            /// # Errors
            ///
            /// Returns an error if the database query fails.
            pub async fn list_active(&self) -> Result<Vec<$entity::Model>, CategoryError> {
                let categories = $entity::Entity::find()
                    .filter($entity::Column::IsActive.eq(true))
                    .order_by_asc($entity::Column::Name)
                    .all(&self.db)
                    .await?;

                Ok(categories)
            }

            /// Finds an active category by exact name.
            ///
            /// # Errors
            ///
            /// Returns an error if the database query fails.
            pub async fn find_by_name(
                &self,
                name: &str,
            ) -> Result<Option<$entity::Model>, CategoryError> {
                let category = $entity::Entity::find()
                    .filter($entity::Column::Name.eq(name))
                    .filter($entity::Column::IsActive.eq(true))
                    .one(&self.db)
                    .await?;

                Ok(category)
            }

            /// Renames or re-parents a category.
            ///
            /// # Errors
            ///
            /// - `NotFound` if the category does not exist
            /// - `Catalog` for a blank name, a missing parent or a cycle
            pub async fn update(
                &self,
                id: $id,
                input: UpdateCategoryInput<$id>,
            ) -> Result<$entity::Model, CategoryError> {
                let txn = self.db.begin().await?;

                let category = $entity::Entity::find_by_id(id.into_inner())
                    .one(&txn)
                    .await?
                    .ok_or(CategoryError::NotFound(id.into_inner()))?;

                let mut active: $entity::ActiveModel = category.into();
                if let Some(name) = input.name {
                    active.name = Set(normalize_name(&name)?);
                }
                if let Some(parent_id) = input.parent_id {
                    let tree = load_tree!(&txn, $entity, $id);
                    tree.validate_parent(id, parent_id)?;
                    active.parent_id = Set(parent_id.map(Uuid::from));
                }

                let updated = active.update(&txn).await?;
                txn.commit().await?;

                info!(category_id = %updated.id, kind = $label, "Category updated");
                Ok(updated)
            }
        }
    };
}

/// Loads every category of one kind into a tree, inactive ones included.
macro_rules! load_tree {
    ($conn:expr, $entity:ident, $id:ty) => {{
        let nodes = $entity::Entity::find().all($conn).await?;
        CategoryTree::<$id>::from_nodes(
            nodes
                .into_iter()
                .map(|node| (<$id>::from(node.id), node.parent_id.map(<$id>::from))),
        )
    }};
}

category_repository!(
    IncomeCategoryRepository,
    income_categories,
    IncomeCategoryId,
    "income"
);
category_repository!(
    ExpenseCategoryRepository,
    expense_categories,
    ExpenseCategoryId,
    "expense"
);
