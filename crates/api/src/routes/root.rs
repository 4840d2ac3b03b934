//! API index.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::AppState;

/// GET `/api` - Links to the top-level resources.
async fn api_root() -> Json<Value> {
    Json(json!({
        "transactions": "/api/transactions",
        "accounts": "/api/accounts",
        "budgets": "/api/budgets",
        "categories": "/api/categories",
        "user": "/api/user",
        "balance_summary": "/api/balance_summary",
        "token": "/api/token",
        "token_refresh": "/api/token/refresh",
        "register": "/api/register"
    }))
}

/// Creates the index route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(api_root))
}
