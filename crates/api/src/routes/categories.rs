//! Income and expense category routes.
//!
//! Both kinds expose the same operations; the handlers are stamped out per
//! kind by `category_handlers!`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::json;
use tally_db::repositories::{
    CreateCategoryInput, ExpenseCategoryRepository, IncomeCategoryRepository, UpdateCategoryInput,
};
use tally_shared::types::{ExpenseCategoryId, IncomeCategoryId};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/income-categories",
            get(list_income_categories).post(create_income_category),
        )
        .route("/income-categories/{category_id}", put(update_income_category))
        .route(
            "/expense-categories",
            get(list_expense_categories).post(create_expense_category),
        )
        .route("/expense-categories/{category_id}", put(update_expense_category))
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Display name.
    pub name: String,
    /// Parent category of the same kind.
    pub parent_id: Option<Uuid>,
}

/// Request body for updating a category.
///
/// An explicit `"parent_id": null` moves the category to the root; leaving
/// the field out keeps the current parent.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New name.
    pub name: Option<String>,
    /// New parent.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub parent_id: Option<Option<Uuid>>,
}

fn deserialize_some<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

macro_rules! category_handlers {
    ($list:ident, $create:ident, $update:ident, $repo:ident, $id:ident, $key:literal) => {
        async fn $list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
            let categories = $repo::new((*state.db).clone()).list_active().await?;
            Ok(Json(json!({ $key: categories })))
        }

        async fn $create(
            State(state): State<AppState>,
            Json(payload): Json<CreateCategoryRequest>,
        ) -> ApiResult<impl IntoResponse> {
            let category = $repo::new((*state.db).clone())
                .create(CreateCategoryInput {
                    name: payload.name,
                    parent_id: payload.parent_id.map($id::from),
                })
                .await?;
            Ok((StatusCode::CREATED, Json(category)))
        }

        async fn $update(
            State(state): State<AppState>,
            Path(category_id): Path<Uuid>,
            Json(payload): Json<UpdateCategoryRequest>,
        ) -> ApiResult<impl IntoResponse> {
            let category = $repo::new((*state.db).clone())
                .update(
                    $id::from(category_id),
                    UpdateCategoryInput {
                        name: payload.name,
                        parent_id: payload.parent_id.map(|p| p.map($id::from)),
                    },
                )
                .await?;
            Ok(Json(category))
        }
    };
}

category_handlers!(
    list_income_categories,
    create_income_category,
    update_income_category,
    IncomeCategoryRepository,
    IncomeCategoryId,
    "income_categories"
);
category_handlers!(
    list_expense_categories,
    create_expense_category,
    update_expense_category,
    ExpenseCategoryRepository,
    ExpenseCategoryId,
    "expense_categories"
);
