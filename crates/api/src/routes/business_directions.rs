//! Business direction routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tally_db::repositories::BusinessDirectionRepository;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the business direction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/business-directions",
        get(list_directions).post(create_direction),
    )
}

/// Request body for creating a direction.
#[derive(Debug, Deserialize)]
pub struct CreateDirectionRequest {
    /// Display name.
    pub name: String,
}

/// GET `/business-directions` - List active directions.
async fn list_directions(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let directions = BusinessDirectionRepository::new((*state.db).clone())
        .list_active()
        .await?;

    Ok(Json(json!({ "business_directions": directions })))
}

/// POST `/business-directions` - Create a direction.
async fn create_direction(
    State(state): State<AppState>,
    Json(payload): Json<CreateDirectionRequest>,
) -> ApiResult<impl IntoResponse> {
    let direction = BusinessDirectionRepository::new((*state.db).clone())
        .create(&payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(direction)))
}
