use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};
use fintrack_db::entities::{accounts, budgets, users};
use fintrack_shared::{AdminSiteConfig, JwtConfig, JwtService};

fn app(db: DatabaseConnection) -> (Router, Arc<JwtService>) {
    let jwt_service = Arc::new(JwtService::new(JwtConfig::default()));
    let state = AppState {
        db: Arc::new(db),
        jwt_service: jwt_service.clone(),
        admin_site: Arc::new(AdminSiteConfig::default()),
    };
    (create_router(state), jwt_service)
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn account(user_id: Uuid, name: &str) -> accounts::Model {
    let now = Utc::now().into();
    accounts::Model {
        id: Uuid::new_v4(),
        user_id,
        name: name.to_string(),
        balance: dec!(1250.00),
        created_at: now,
        updated_at: now,
    }
}

fn budget(user_id: Uuid, spent: rust_decimal::Decimal, end_date: NaiveDate) -> budgets::Model {
    let now = Utc::now().into();
    budgets::Model {
        id: Uuid::new_v4(),
        user_id,
        account_id: Uuid::new_v4(),
        name: "Groceries".to_string(),
        total_amount: dec!(1000.00),
        spent_amount: spent,
        start_date: end_date - Duration::days(30),
        end_date,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = app(empty_db());

    let response = app.oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "fintrack");
    assert_eq!(body["today"], Utc::now().date_naive().to_string());
}

#[tokio::test]
async fn test_api_index_lists_resources() {
    let (app, _) = app(empty_db());

    let response = app.oneshot(get("/api", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["budgets"], "/api/budgets");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let (app, _) = app(empty_db());

    let response = app.oneshot(get("/api/accounts", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let (app, jwt) = app(empty_db());
    let refresh = jwt
        .generate_refresh_token(Uuid::new_v4(), "alice", false)
        .unwrap();

    let response = app
        .oneshot(get("/api/accounts", Some(&refresh)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "token_not_valid");
}

#[tokio::test]
async fn test_lists_callers_accounts() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![account(user_id, "Checking"), account(user_id, "Savings")]])
        .into_connection();
    let (app, jwt) = app(db);
    let token = jwt.generate_access_token(user_id, "alice", false).unwrap();

    let response = app
        .oneshot(get("/api/accounts", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["name"], "Checking");
    assert_eq!(body[0]["user"], user_id.to_string());
}

#[tokio::test]
async fn test_budget_progress_endpoint() {
    let user_id = Uuid::new_v4();
    let ends = Utc::now().date_naive() + Duration::days(10);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![budget(user_id, dec!(850.00), ends)]])
        .into_connection();
    let (app, jwt) = app(db);
    let token = jwt.generate_access_token(user_id, "alice", false).unwrap();

    let uri = format!("/api/budgets/{}/progress", Uuid::new_v4());
    let response = app.oneshot(get(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "WARNING");
    assert_eq!(body["is_active"], true);
    assert_eq!(body["remaining"], "150.00");
}

#[tokio::test]
async fn test_unknown_budget_is_not_found() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<budgets::Model>::new()])
        .into_connection();
    let (app, jwt) = app(db);
    let token = jwt.generate_access_token(user_id, "alice", false).unwrap();

    let uri = format!("/api/budgets/{}", Uuid::new_v4());
    let response = app.oneshot(get(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_budget_is_rejected_before_storage() {
    let (app, jwt) = app(empty_db());
    let token = jwt
        .generate_access_token(Uuid::new_v4(), "alice", false)
        .unwrap();

    let payload = serde_json::json!({
        "account": Uuid::new_v4(),
        "name": "Holiday",
        "total_amount": "500.00",
        "start_date": "2026-10-31",
        "end_date": "2026-10-01"
    });
    let response = app
        .oneshot(post_json("/api/budgets", Some(&token), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_sub_cent_transaction_is_rejected_before_storage() {
    let (app, jwt) = app(empty_db());
    let token = jwt
        .generate_access_token(Uuid::new_v4(), "alice", false)
        .unwrap();

    let payload = serde_json::json!({
        "account": Uuid::new_v4(),
        "type": "withdrawal",
        "amount": "0.001",
        "description": "Rounding error"
    });
    let response = app
        .oneshot(post_json("/api/transactions", Some(&token), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_unknown_user_cannot_obtain_token() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();
    let (app, _) = app(db);

    let payload = serde_json::json!({ "username": "ghost", "password": "whatever1" });
    let response = app
        .oneshot(post_json("/api/token", None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "No active account found with the given credentials"
    );
}

#[tokio::test]
async fn test_admin_requires_staff() {
    let (app, jwt) = app(empty_db());
    let token = jwt
        .generate_access_token(Uuid::new_v4(), "alice", false)
        .unwrap();

    let response = app
        .oneshot(get("/api/admin/site", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_requires_token() {
    let (app, _) = app(empty_db());

    let response = app.oneshot(get("/api/admin/site", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_site_for_staff() {
    let (app, jwt) = app(empty_db());
    let token = jwt
        .generate_access_token(Uuid::new_v4(), "admin", true)
        .unwrap();

    let response = app
        .oneshot(get("/api/admin/site", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["site_header"], "Finance Dashboard Administration");
}

#[tokio::test]
async fn test_admin_reset_spent_message() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 2,
        }])
        .into_connection();
    let (app, jwt) = app(db);
    let token = jwt
        .generate_access_token(Uuid::new_v4(), "admin", true)
        .unwrap();

    let payload = serde_json::json!({ "ids": [Uuid::new_v4(), Uuid::new_v4()] });
    let response = app
        .oneshot(post_json(
            "/api/admin/budgets/actions/reset-spent",
            Some(&token),
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["affected"], 2);
    assert_eq!(body["message"], "2 budget(s) reset to zero spent.");
}

#[tokio::test]
async fn test_admin_budget_status_filter() {
    let user_id = Uuid::new_v4();
    let today = Utc::now().date_naive();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            budget(user_id, dec!(100.00), today + Duration::days(5)),
            budget(user_id, dec!(1200.00), today + Duration::days(5)),
            budget(user_id, dec!(1200.00), today - Duration::days(1)),
        ]])
        .into_connection();
    let (app, jwt) = app(db);
    let token = jwt
        .generate_access_token(Uuid::new_v4(), "admin", true)
        .unwrap();

    let response = app
        .oneshot(get("/api/admin/budgets?status=over", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["progress"]["status"], "OVER");
}

#[tokio::test]
async fn test_admin_rejects_unknown_status_filter() {
    let (app, jwt) = app(empty_db());
    let token = jwt
        .generate_access_token(Uuid::new_v4(), "admin", true)
        .unwrap();

    let response = app
        .oneshot(get("/api/admin/budgets?status=broke", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
