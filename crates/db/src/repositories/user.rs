//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set,
};
use tally_core::catalog::{CatalogError, UserRole, UserScope, hash_password, normalize_name};
use tally_shared::AppError;
use tally_shared::types::UserId;
use tracing::info;
use uuid::Uuid;

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Username already taken.
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    /// Email already registered.
    #[error("Email '{0}' already exists")]
    DuplicateEmail(String),

    /// Blank field or rejected password.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => Self::NotFound(err.to_string()),
            UserError::DuplicateUsername(_) | UserError::DuplicateEmail(_) => {
                Self::Conflict(err.to_string())
            }
            UserError::Catalog(e) => e.into(),
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Plain password; only its hash is stored.
    pub password: String,
    /// Visibility role.
    pub role: UserRole,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Gets a user or fails with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub async fn get(&self, id: UserId) -> Result<users::Model, UserError> {
        self.find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.into_inner()))
    }

    /// Creates a user, hashing the password with Argon2id.
    ///
    /// # Errors
    ///
    /// - `Catalog` for a blank username or email, or a short password
    /// - `DuplicateUsername` / `DuplicateEmail` if either is taken
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let username = normalize_name(&input.username)?;
        let email = normalize_name(&input.email)?.to_lowercase();

        let existing = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(&username))
                    .add(users::Column::Email.eq(&email)),
            )
            .one(&self.db)
            .await?;
        if let Some(existing) = existing {
            return Err(if existing.username == username {
                UserError::DuplicateUsername(username)
            } else {
                UserError::DuplicateEmail(email)
            });
        }

        let password_hash = hash_password(&input.password).map_err(CatalogError::from)?;

        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(input.role.into()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(user_id = %user.id, role = input.role.as_str(), "User created");
        Ok(user)
    }
}

/// Returns the visibility scope a stored user acts with.
#[must_use]
pub fn scope_for(user: &users::Model) -> UserScope {
    UserScope::for_user(user.id.into(), user.role.into())
}
