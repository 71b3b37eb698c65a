//! User routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tally_core::catalog::UserRole;
use tally_db::repositories::{CreateUserInput, UserRepository};
use tally_shared::types::UserId;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/{user_id}", get(get_user))
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Unique login name.
    pub username: String,
    /// Unique email.
    pub email: String,
    /// Plain password, at least 8 characters.
    pub password: String,
    /// `admin` or `manager`; defaults to `manager`.
    pub role: Option<String>,
}

/// POST `/users` - Create a user.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = payload
        .role
        .as_deref()
        .map(UserRole::from_str)
        .transpose()?
        .unwrap_or(UserRole::Manager);

    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET `/users/{user_id}` - Fetch a user.
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = UserRepository::new((*state.db).clone())
        .get(UserId::from(user_id))
        .await?;

    Ok(Json(user))
}
