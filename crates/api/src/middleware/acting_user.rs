//! Caller identity.
//!
//! The service does not authenticate. Each scoped request names its acting
//! user in the `X-User-Id` header; the user is loaded per request and their
//! role decides which records they see.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use serde_json::{Value, json};
use tally_core::catalog::{UserRole, UserScope};
use tally_db::repositories::{UserRepository, scope_for};
use tally_shared::types::UserId;
use tracing::error;
use uuid::Uuid;

use crate::AppState;

/// Header carrying the acting user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts as.
#[derive(Debug, Clone, Copy)]
pub struct ActingUser {
    /// User id.
    pub user_id: UserId,
    /// Role.
    pub role: UserRole,
    /// Records this user may see.
    pub scope: UserScope,
}

fn rejection(status: StatusCode, error: &str, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": error, "message": message })))
}

impl FromRequestParts<AppState> for ActingUser {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
        else {
            return Err(rejection(
                StatusCode::UNAUTHORIZED,
                "missing_user_id",
                "X-User-Id header is required",
            ));
        };

        let Ok(id) = Uuid::parse_str(raw.trim()) else {
            return Err(rejection(
                StatusCode::BAD_REQUEST,
                "invalid_user_id",
                "X-User-Id must be a UUID",
            ));
        };

        let user = UserRepository::new((*state.db).clone())
            .find_by_id(UserId::from(id))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to load acting user");
                rejection(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An error occurred",
                )
            })?
            .ok_or_else(|| {
                rejection(StatusCode::UNAUTHORIZED, "unknown_user", "Acting user does not exist")
            })?;

        Ok(Self {
            user_id: user.id.into(),
            role: user.role.into(),
            scope: scope_for(&user),
        })
    }
}
