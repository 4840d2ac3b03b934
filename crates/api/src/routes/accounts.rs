//! Account routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::validation::validate_account;
use fintrack_db::{
    AccountRepository, entities::accounts, repositories::account::AccountInput,
};

/// Creates the account routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or replacing an account.
#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    /// Display name.
    pub name: String,
    /// Opening (or corrected) balance.
    #[serde(default)]
    pub balance: Decimal,
}

/// An account as returned by the API.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user: Uuid,
    /// Display name.
    pub name: String,
    /// Current balance.
    pub balance: Decimal,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Last modification time.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<accounts::Model> for AccountResponse {
    fn from(account: accounts::Model) -> Self {
        Self {
            id: account.id,
            user: account.user_id,
            name: account.name,
            balance: account.balance,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl AccountRequest {
    fn into_input(self) -> ApiResult<AccountInput> {
        let name = self.name.trim().to_string();
        validate_account(&name, self.balance)?;
        Ok(AccountInput {
            name,
            balance: self.balance,
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/accounts` - The caller's accounts, by name.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let repo = AccountRepository::new(state.db());
    let accounts = repo.list(auth.user_id()).await?;

    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// POST `/accounts` - Open an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_input()?;

    let repo = AccountRepository::new(state.db());
    let account = repo.create(auth.user_id(), input).await?;

    info!(user_id = %auth.user_id(), account_id = %account.id, "Account created");
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// GET `/accounts/{id}`
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountResponse>> {
    let repo = AccountRepository::new(state.db());
    let account = repo.get(auth.user_id(), id).await?;

    Ok(Json(account.into()))
}

/// PUT `/accounts/{id}` - Replace name and balance.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let input = payload.into_input()?;

    let repo = AccountRepository::new(state.db());
    let account = repo.update(auth.user_id(), id, input).await?;

    info!(user_id = %auth.user_id(), account_id = %id, "Account updated");
    Ok(Json(account.into()))
}

/// DELETE `/accounts/{id}` - Removes the account with its budgets and transactions.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = AccountRepository::new(state.db());
    repo.delete(auth.user_id(), id).await?;

    info!(user_id = %auth.user_id(), account_id = %id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}
