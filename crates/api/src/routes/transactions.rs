//! Transaction routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tally_core::ledger::{PostTransactionInput, TransactionKind};
use tally_core::reports::{BoundSide, ReportPeriod, parse_bound};
use tally_db::repositories::{TransactionFilter, TransactionRepository};
use tally_shared::types::TransactionId;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::ActingUser;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/{transaction_id}", get(get_transaction))
}

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Inclusive lower bound: `YYYY-MM-DD`, naive ISO datetime (UTC) or RFC 3339.
    pub start_date: Option<String>,
    /// Inclusive upper bound; a bare date covers the whole day.
    pub end_date: Option<String>,
    /// `income`, `expense` or `transfer`.
    pub transaction_type: Option<String>,
    /// Account on either side.
    pub account_id: Option<Uuid>,
}

/// Request body for posting a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// `income`, `expense` or `transfer`.
    pub transaction_type: String,
    /// Positive amount with at most two fractional digits.
    pub amount: Decimal,
    /// Free-form description.
    pub description: Option<String>,
    /// Business date; defaults to now.
    pub transaction_date: Option<String>,
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
}

/// GET `/transactions` - List transactions visible to the acting user.
async fn list_transactions(
    State(state): State<AppState>,
    user: ActingUser,
    Query(query): Query<ListTransactionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = TransactionFilter {
        period: ReportPeriod::parse(query.start_date.as_deref(), query.end_date.as_deref())?,
        kind: query
            .transaction_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(TransactionKind::from_str)
            .transpose()?,
        account_id: query.account_id.map(Into::into),
    };

    let transactions = TransactionRepository::new((*state.db).clone())
        .list(user.scope, &filter)
        .await?;

    Ok(Json(json!({ "transactions": transactions })))
}

/// POST `/transactions` - Post a transaction as the acting user.
async fn create_transaction(
    State(state): State<AppState>,
    user: ActingUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind = TransactionKind::from_str(&payload.transaction_type)?;
    let transaction_date = payload
        .transaction_date
        .as_deref()
        .map(|raw| parse_bound(raw, BoundSide::Start))
        .transpose()?;

    let input = PostTransactionInput {
        kind,
        amount: payload.amount,
        description: payload.description,
        transaction_date,
        user_id: user.user_id,
        from_account_id: payload.from_account_id.map(Into::into),
        to_account_id: payload.to_account_id.map(Into::into),
        income_category_id: payload.income_category_id.map(Into::into),
        expense_category_id: payload.expense_category_id.map(Into::into),
        business_direction_id: payload.business_direction_id.map(Into::into),
    };

    let transaction = TransactionRepository::new((*state.db).clone())
        .post(input)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET `/transactions/{transaction_id}` - Fetch one visible transaction.
async fn get_transaction(
    State(state): State<AppState>,
    user: ActingUser,
    Path(transaction_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let transaction = TransactionRepository::new((*state.db).clone())
        .get(user.scope, TransactionId::from(transaction_id))
        .await?;

    Ok(Json(transaction))
}
