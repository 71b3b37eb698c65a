//! HTTP tests driving the full router against an in-memory database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tally_api::{AppState, create_router};
use tally_db::migration::{Migrator, MigratorTrait};
use tally_shared::LedgerConfig;
use tower::ServiceExt;

async fn app_with(ledger: LedgerConfig) -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    create_router(AppState::new(db, ledger))
}

async fn app() -> Router {
    app_with(LedgerConfig::default()).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("X-User-Id", user);
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_user(app: &Router, username: &str, role: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/users",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "correct horse battery",
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_account(app: &Router, name: &str, balance: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/accounts",
        None,
        Some(json!({
            "name": name,
            "account_type": "bank_account",
            "initial_balance": balance
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn balance(app: &Router, account: &str) -> Decimal {
    let (_, body) = send(app, "GET", &format!("/api/v1/accounts/{account}"), None, None).await;
    body["current_balance"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_user_response_hides_password_hash() {
    let app = app().await;
    let id = create_user(&app, "alice", "admin").await;

    let (status, body) = send(&app, "GET", &format!("/api/v1/users/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_account_defaults_to_configured_currency() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/accounts",
        None,
        Some(json!({ "name": "Cash desk", "account_type": "cash", "initial_balance": "50000" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["currency"], "RUB");
    assert_eq!(body["initial_balance"], body["current_balance"]);
}

#[tokio::test]
async fn test_unknown_account_type_is_bad_request() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/accounts",
        None,
        Some(json!({ "name": "Wallet", "account_type": "wallet" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_post_transaction_updates_balance() {
    let app = app().await;
    let user = create_user(&app, "admin", "admin").await;
    let account = create_account(&app, "Settlement account", 100_000).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/transactions",
        Some(&user),
        Some(json!({
            "transaction_type": "income",
            "amount": 5000,
            "to_account_id": account,
            "transaction_date": "2026-01-05"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transaction_type"], "income");
    assert_eq!(body["user_id"], user.as_str());
    assert_eq!(balance(&app, &account).await, dec!(105000));
}

#[tokio::test]
async fn test_datetime_local_dates_accepted() {
    let app = app().await;
    let user = create_user(&app, "admin", "admin").await;
    let account = create_account(&app, "Settlement account", 100_000).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/transactions",
        Some(&user),
        Some(json!({
            "transaction_type": "income",
            "amount": "12.5",
            "to_account_id": account,
            "transaction_date": "2026-03-01T10:30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["transaction_date"].as_str().unwrap().starts_with("2026-03-01T10:30:00"));

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/transactions?start_date=2026-03-01T00:00:00&end_date=2026-03-01T23:59",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/planned-transactions",
        Some(&user),
        Some(json!({
            "transaction_type": "expense",
            "amount": "300",
            "from_account_id": account,
            "planned_date": "2026-03-05T09:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_amounts_always_carry_two_digits() {
    let app = app().await;
    let user = create_user(&app, "admin", "admin").await;
    let account = create_account(&app, "Cash desk", 0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/transactions",
        Some(&user),
        Some(json!({
            "transaction_type": "income",
            "amount": "0.5",
            "to_account_id": account,
            "transaction_date": "2026-01-10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["amount"], "0.50");

    let (_, body) = send(&app, "GET", &format!("/api/v1/accounts/{account}"), None, None).await;
    assert_eq!(body["current_balance"], "0.50");
    assert_eq!(body["initial_balance"], "0.00");

    let (_, body) = send(&app, "GET", "/api/v1/reports/cash-flow", Some(&user), None).await;
    assert_eq!(body["total_income"], "0.50");
    assert_eq!(body["net_flow"], "0.50");
}

#[tokio::test]
async fn test_transaction_requires_acting_user() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/v1/transactions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_user_id");

    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/transactions",
        Some("not-a-uuid"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/transactions",
        Some("018f0000-0000-7000-8000-000000000000"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_amount_and_type_rejected() {
    let app = app().await;
    let user = create_user(&app, "admin", "admin").await;
    let account = create_account(&app, "A", 100).await;

    for payload in [
        json!({ "transaction_type": "expense", "amount": 0, "from_account_id": account }),
        json!({ "transaction_type": "expense", "amount": "-5", "from_account_id": account }),
        json!({ "transaction_type": "expense", "amount": "1.005", "from_account_id": account }),
        json!({ "transaction_type": "refund", "amount": 5, "from_account_id": account }),
    ] {
        let (status, _) = send(&app, "POST", "/api/v1/transactions", Some(&user), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert_eq!(balance(&app, &account).await, dec!(100));
}

#[tokio::test]
async fn test_unknown_account_is_not_found() {
    let app = app().await;
    let user = create_user(&app, "admin", "admin").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/transactions",
        Some(&user),
        Some(json!({
            "transaction_type": "expense",
            "amount": 10,
            "from_account_id": "018f0000-0000-7000-8000-000000000001"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plan_completion_strict_by_default() {
    let app = app().await;
    let user = create_user(&app, "admin", "admin").await;
    let account = create_account(&app, "A", 100_000).await;

    let (status, plan) = send(
        &app,
        "POST",
        "/api/v1/planned-transactions",
        Some(&user),
        Some(json!({
            "transaction_type": "expense",
            "amount": 300,
            "planned_date": "2026-03-01",
            "from_account_id": account,
            "is_recurring": true,
            "recurrence_pattern": "monthly"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let plan_id = plan["id"].as_str().unwrap();
    let uri = format!("/api/v1/planned-transactions/{plan_id}/complete");

    let (status, body) = send(&app, "POST", &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["planned_transaction"]["is_completed"], true);
    assert_eq!(
        body["planned_transaction"]["completed_transaction_id"],
        body["transaction"]["id"]
    );
    assert_eq!(balance(&app, &account).await, dec!(99700));

    let (status, body) = send(&app, "POST", &uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(balance(&app, &account).await, dec!(99700));

    let (_, pending) = send(&app, "GET", "/api/v1/planned-transactions", Some(&user), None).await;
    assert_eq!(pending["planned_transactions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_plan_recompletion_when_enabled() {
    let app = app_with(LedgerConfig {
        allow_plan_recompletion: true,
        ..LedgerConfig::default()
    })
    .await;
    let user = create_user(&app, "admin", "admin").await;
    let account = create_account(&app, "A", 1000).await;

    let (_, plan) = send(
        &app,
        "POST",
        "/api/v1/planned-transactions",
        Some(&user),
        Some(json!({
            "transaction_type": "expense",
            "amount": 100,
            "planned_date": "2026-03-01",
            "from_account_id": account
        })),
    )
    .await;
    let uri = format!("/api/v1/planned-transactions/{}/complete", plan["id"].as_str().unwrap());

    let (first, _) = send(&app, "POST", &uri, Some(&user), None).await;
    let (second, _) = send(&app, "POST", &uri, Some(&user), None).await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);
    assert_eq!(balance(&app, &account).await, dec!(800));

    let (_, list) = send(&app, "GET", "/api/v1/transactions", Some(&user), None).await;
    assert_eq!(list["transactions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_manager_scope_on_transactions() {
    let app = app().await;
    let admin = create_user(&app, "admin", "admin").await;
    let manager = create_user(&app, "manager", "manager").await;
    let account = create_account(&app, "A", 1000).await;

    let (_, admins) = send(
        &app,
        "POST",
        "/api/v1/transactions",
        Some(&admin),
        Some(json!({ "transaction_type": "expense", "amount": 10, "from_account_id": account })),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/transactions",
        Some(&manager),
        Some(json!({ "transaction_type": "expense", "amount": 20, "from_account_id": account })),
    )
    .await;

    let (_, own) = send(&app, "GET", "/api/v1/transactions", Some(&manager), None).await;
    assert_eq!(own["transactions"].as_array().unwrap().len(), 1);

    let (_, all) = send(&app, "GET", "/api/v1/transactions", Some(&admin), None).await;
    assert_eq!(all["transactions"].as_array().unwrap().len(), 2);

    let uri = format!("/api/v1/transactions/{}", admins["id"].as_str().unwrap());
    let (status, _) = send(&app, "GET", &uri, Some(&manager), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cash_flow_report() {
    let app = app().await;
    let user = create_user(&app, "admin", "admin").await;
    let account = create_account(&app, "A", 100_000).await;

    for (kind, amount, side) in [
        ("income", 5000, "to_account_id"),
        ("expense", 2000, "from_account_id"),
    ] {
        send(
            &app,
            "POST",
            "/api/v1/transactions",
            Some(&user),
            Some(json!({
                "transaction_type": kind,
                "amount": amount,
                side: account,
                "transaction_date": "2026-01-15"
            })),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/reports/cash-flow?start_date=2026-01-01&end_date=2026-01-31",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["net_flow"].as_str().unwrap().parse::<Decimal>().unwrap(),
        dec!(3000)
    );

    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/reports/cash-flow?start_date=2026-02-01&end_date=2026-01-01",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_cycle_rejected() {
    let app = app().await;
    let (_, root) = send(
        &app,
        "POST",
        "/api/v1/expense-categories",
        None,
        Some(json!({ "name": "Operations" })),
    )
    .await;
    let (status, child) = send(
        &app,
        "POST",
        "/api/v1/expense-categories",
        None,
        Some(json!({ "name": "Rent", "parent_id": root["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/expense-categories/{}", root["id"].as_str().unwrap()),
        None,
        Some(json!({ "parent_id": child["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reconciliation_route() {
    let app = app().await;
    let user = create_user(&app, "admin", "admin").await;
    let account = create_account(&app, "A", 1000).await;
    send(
        &app,
        "POST",
        "/api/v1/transactions",
        Some(&user),
        Some(json!({ "transaction_type": "income", "amount": 250, "to_account_id": account })),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/accounts/{account}/reconciliation"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_consistent"], true);
}

#[tokio::test]
async fn test_deactivated_account_leaves_list() {
    let app = app().await;
    let account = create_account(&app, "A", 0).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/accounts/{account}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/v1/accounts", None, None).await;
    assert!(body["accounts"].as_array().unwrap().is_empty());
}
