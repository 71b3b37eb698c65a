//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod business_directions;
pub mod categories;
pub mod health;
pub mod planned_transactions;
pub mod reports;
pub mod transactions;
pub mod users;

/// Creates the API router with all routes.
///
/// Routes that act on owned records take an [`crate::middleware::ActingUser`];
/// catalog routes do not.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(accounts::routes())
        .merge(categories::routes())
        .merge(business_directions::routes())
        .merge(transactions::routes())
        .merge(planned_transactions::routes())
        .merge(reports::routes())
}
