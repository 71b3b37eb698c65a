//! Business direction repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tally_core::catalog::{CatalogError, normalize_name};
use tally_shared::AppError;
use tally_shared::types::BusinessDirectionId;
use tracing::info;

use crate::entities::business_directions;

/// Error types for business direction operations.
#[derive(Debug, thiserror::Error)]
pub enum BusinessDirectionError {
    /// Blank name.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BusinessDirectionError> for AppError {
    fn from(err: BusinessDirectionError) -> Self {
        match err {
            BusinessDirectionError::Catalog(e) => e.into(),
            BusinessDirectionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Business direction repository.
#[derive(Debug, Clone)]
pub struct BusinessDirectionRepository {
    db: DatabaseConnection,
}

impl BusinessDirectionRepository {
    /// Creates a new business direction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a direction.
    ///
    /// # Errors
    ///
    /// Returns `Catalog` for a blank name.
    pub async fn create(
        &self,
        name: &str,
    ) -> Result<business_directions::Model, BusinessDirectionError> {
        let direction = business_directions::ActiveModel {
            id: Set(BusinessDirectionId::new().into_inner()),
            name: Set(normalize_name(name)?),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(direction_id = %direction.id, name = %direction.name, "Business direction created");
        Ok(direction)
    }

    /// Lists active directions by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(
        &self,
    ) -> Result<Vec<business_directions::Model>, BusinessDirectionError> {
        let directions = business_directions::Entity::find()
            .filter(business_directions::Column::IsActive.eq(true))
            .order_by_asc(business_directions::Column::Name)
            .all(&self.db)
            .await?;

        Ok(directions)
    }

    /// Finds an active direction by exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<business_directions::Model>, BusinessDirectionError> {
        let direction = business_directions::Entity::find()
            .filter(business_directions::Column::Name.eq(name))
            .filter(business_directions::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        Ok(direction)
    }
}
