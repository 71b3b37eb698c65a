//! Report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tally_core::reports::ReportPeriod;
use tally_db::repositories::ReportRepository;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::ActingUser;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/cash-flow", get(cash_flow))
        .route("/reports/profit-loss", get(profit_loss))
}

/// Query parameters shared by the reports.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Inclusive lower bound.
    pub start_date: Option<String>,
    /// Inclusive upper bound; a bare date covers the whole day.
    pub end_date: Option<String>,
}

impl ReportQuery {
    fn period(&self) -> Result<ReportPeriod, tally_core::reports::ReportError> {
        ReportPeriod::parse(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// GET `/reports/cash-flow` - Income, expense and net flow.
async fn cash_flow(
    State(state): State<AppState>,
    user: ActingUser,
    Query(query): Query<ReportQuery>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportRepository::new((*state.db).clone())
        .cash_flow(user.scope, query.period()?)
        .await?;

    Ok(Json(report))
}

/// GET `/reports/profit-loss` - Totals by category name.
async fn profit_loss(
    State(state): State<AppState>,
    user: ActingUser,
    Query(query): Query<ReportQuery>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportRepository::new((*state.db).clone())
        .profit_loss(user.scope, query.period()?)
        .await?;

    Ok(Json(report))
}
