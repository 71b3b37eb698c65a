//! Planned transaction routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tally_core::ledger::TransactionKind;
use tally_core::planning::{CreatePlanInput, RecurrencePattern};
use tally_core::reports::{BoundSide, parse_bound};
use tally_db::repositories::PlannedTransactionRepository;
use tally_shared::types::PlannedTransactionId;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::ActingUser;

/// Creates the planned transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/planned-transactions",
            get(list_planned).post(create_planned),
        )
        .route("/planned-transactions/{plan_id}", get(get_planned))
        .route(
            "/planned-transactions/{plan_id}/complete",
            post(complete_planned),
        )
}

/// Request body for creating a plan.
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    /// `income`, `expense` or `transfer`.
    pub transaction_type: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Free-form description.
    pub description: Option<String>,
    /// Target date: `YYYY-MM-DD`, naive ISO datetime (UTC) or RFC 3339.
    pub planned_date: String,
    /// Source account.
    pub from_account_id: Option<Uuid>,
    /// Destination account.
    pub to_account_id: Option<Uuid>,
    /// Income category.
    pub income_category_id: Option<Uuid>,
    /// Expense category.
    pub expense_category_id: Option<Uuid>,
    /// Business direction.
    pub business_direction_id: Option<Uuid>,
    /// Whether the plan recurs.
    #[serde(default)]
    pub is_recurring: bool,
    /// `daily`, `weekly`, `monthly` or `yearly`.
    pub recurrence_pattern: Option<String>,
}

/// GET `/planned-transactions` - Pending plans, earliest first.
async fn list_planned(
    State(state): State<AppState>,
    user: ActingUser,
) -> ApiResult<impl IntoResponse> {
    let plans = PlannedTransactionRepository::new((*state.db).clone())
        .list_pending(user.scope)
        .await?;

    Ok(Json(json!({ "planned_transactions": plans })))
}

/// POST `/planned-transactions` - Create a plan for the acting user.
async fn create_planned(
    State(state): State<AppState>,
    user: ActingUser,
    Json(payload): Json<CreatePlanRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = CreatePlanInput {
        kind: TransactionKind::from_str(&payload.transaction_type)?,
        amount: payload.amount,
        description: payload.description,
        planned_date: parse_bound(&payload.planned_date, BoundSide::Start)?,
        user_id: user.user_id,
        from_account_id: payload.from_account_id.map(Into::into),
        to_account_id: payload.to_account_id.map(Into::into),
        income_category_id: payload.income_category_id.map(Into::into),
        expense_category_id: payload.expense_category_id.map(Into::into),
        business_direction_id: payload.business_direction_id.map(Into::into),
        is_recurring: payload.is_recurring,
        recurrence_pattern: payload
            .recurrence_pattern
            .as_deref()
            .map(RecurrencePattern::from_str)
            .transpose()?,
    };

    let plan = PlannedTransactionRepository::new((*state.db).clone())
        .create(input)
        .await?;

    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET `/planned-transactions/{plan_id}` - Fetch one visible plan.
async fn get_planned(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let plan = PlannedTransactionRepository::new((*state.db).clone())
        .get(user.scope, PlannedTransactionId::from(plan_id))
        .await?;

    Ok(Json(plan))
}

/// POST `/planned-transactions/{plan_id}/complete` - Realize a plan.
async fn complete_planned(
    State(state): State<AppState>,
    user: ActingUser,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let completed = PlannedTransactionRepository::new((*state.db).clone())
        .complete(
            user.scope,
            PlannedTransactionId::from(plan_id),
            state.completion_policy(),
        )
        .await?;

    info!(
        plan_id = %plan_id,
        acting_user = %user.user_id,
        "Plan completion requested"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "transaction": completed.transaction,
            "planned_transaction": completed.plan,
        })),
    ))
}
