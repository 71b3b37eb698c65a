//! Account routes.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tally_core::catalog::{AccountKind, CatalogError};
use tally_db::repositories::{AccountRepository, CreateAccountInput, UpdateAccountInput};
use tally_shared::types::{AccountId, CurrencyCode, Money};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{account_id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{account_id}/reconciliation", get(reconcile_account))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name.
    pub name: String,
    /// Account kind, e.g. `bank_account`.
    pub account_type: String,
    /// Opening balance; defaults to zero.
    #[serde(default)]
    pub initial_balance: Decimal,
    /// Currency code; defaults to the configured currency.
    pub currency: Option<String>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub account_type: Option<String>,
}

fn parse_currency(raw: &str) -> Result<CurrencyCode, CatalogError> {
    CurrencyCode::from_str(raw).map_err(|_| CatalogError::InvalidCurrency(raw.to_string()))
}

/// GET `/accounts` - List active accounts.
async fn list_accounts(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let accounts = AccountRepository::new((*state.db).clone())
        .list_active()
        .await?;

    Ok(Json(json!({ "accounts": accounts })))
}

/// POST `/accounts` - Open an account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind = AccountKind::from_str(&payload.account_type)?;
    let currency = parse_currency(
        payload
            .currency
            .as_deref()
            .unwrap_or(&state.ledger.default_currency),
    )?;

    let account = AccountRepository::new((*state.db).clone())
        .create(CreateAccountInput {
            name: payload.name,
            kind,
            initial_balance: payload.initial_balance,
            currency,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET `/accounts/{account_id}` - Fetch an account.
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let account = AccountRepository::new((*state.db).clone())
        .get(AccountId::from(account_id))
        .await?;

    Ok(Json(account))
}

/// PUT `/accounts/{account_id}` - Rename or re-type an account.
async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let kind = payload
        .account_type
        .as_deref()
        .map(AccountKind::from_str)
        .transpose()?;

    let account = AccountRepository::new((*state.db).clone())
        .update(
            AccountId::from(account_id),
            UpdateAccountInput {
                name: payload.name,
                kind,
            },
        )
        .await?;

    Ok(Json(account))
}

/// DELETE `/accounts/{account_id}` - Deactivate an account.
async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    AccountRepository::new((*state.db).clone())
        .deactivate(AccountId::from(account_id))
        .await?;

    Ok(Json(json!({ "message": "Account deactivated" })))
}

/// GET `/accounts/{account_id}/reconciliation` - Compare the stored balance
/// with the balance replayed from history.
async fn reconcile_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let reconciliation = AccountRepository::new((*state.db).clone())
        .reconcile(AccountId::from(account_id))
        .await?;

    Ok(Json(json!({
        "account_id": reconciliation.account_id,
        "stored_balance": Money::scaled(reconciliation.stored_balance),
        "expected_balance": Money::scaled(reconciliation.expected_balance),
        "drift": Money::scaled(reconciliation.drift),
        "is_consistent": reconciliation.is_consistent(),
    })))
}
