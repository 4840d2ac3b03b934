//! Transaction routes.
//!
//! Writes go through `TransactionRepository`, which keeps account balances
//! and budget spend in step with the rows.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
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
use fintrack_core::transaction::{TransactionType, validate_transaction};
use fintrack_db::{
    TransactionRepository,
    entities::transactions,
    repositories::transaction::{TransactionFilter, TransactionInput},
};
use fintrack_shared::types::{PageRequest, PageResponse};

/// Creates the transaction routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// `deposit` or `withdrawal`.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Only transactions on this account.
    pub account: Option<Uuid>,
    /// Only transactions in this category.
    pub category: Option<Uuid>,
}

impl TransactionListQuery {
    fn page(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
        .normalized()
    }

    fn filter(&self) -> ApiResult<TransactionFilter> {
        let transaction_type = self
            .transaction_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::parse::<TransactionType>)
            .transpose()?
            .map(Into::into);

        Ok(TransactionFilter {
            transaction_type,
            account_id: self.account,
            category_id: self.category,
        })
    }
}

/// Request body for recording or replacing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    /// Account the money moves in or out of.
    pub account: Uuid,
    /// Optional category; withdrawals count against its budget.
    #[serde(default)]
    pub category: Option<Uuid>,
    /// `deposit` or `withdrawal`.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Positive amount.
    pub amount: Decimal,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl TransactionRequest {
    fn into_input(self) -> ApiResult<TransactionInput> {
        validate_transaction(self.amount, &self.description)?;

        Ok(TransactionInput {
            account_id: self.account,
            category_id: self.category,
            transaction_type: self.transaction_type.into(),
            amount: self.amount,
            description: self.description,
        })
    }
}

/// A transaction as returned by the API.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user: Uuid,
    /// Account ID.
    pub account: Uuid,
    /// Category ID.
    pub category: Option<Uuid>,
    /// `deposit` or `withdrawal`.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// When the transaction was recorded.
    pub date: DateTime<FixedOffset>,
    /// Last modification time.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(transaction: transactions::Model) -> Self {
        Self {
            id: transaction.id,
            user: transaction.user_id,
            account: transaction.account_id,
            category: transaction.category_id,
            transaction_type: TransactionType::from(transaction.transaction_type),
            amount: transaction.amount,
            description: transaction.description,
            date: transaction.occurred_at,
            updated_at: transaction.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/transactions` - The caller's transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TransactionListQuery>,
) -> ApiResult<Json<PageResponse<TransactionResponse>>> {
    let page = query.page();
    let filter = query.filter()?;

    let repo = TransactionRepository::new(state.db());
    let (rows, total) = repo.list(auth.user_id(), filter, &page).await?;

    Ok(Json(
        PageResponse::new(rows, page.page, page.per_page, total).map(TransactionResponse::from),
    ))
}

/// POST `/transactions`
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_input()?;

    let repo = TransactionRepository::new(state.db());
    let transaction = repo.create(auth.user_id(), input).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::from(transaction)),
    ))
}

/// GET `/transactions/{id}`
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TransactionResponse>> {
    let repo = TransactionRepository::new(state.db());
    let transaction = repo.get(auth.user_id(), id).await?;

    Ok(Json(transaction.into()))
}

/// PUT `/transactions/{id}`
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionRequest>,
) -> ApiResult<Json<TransactionResponse>> {
    let input = payload.into_input()?;

    let repo = TransactionRepository::new(state.db());
    let transaction = repo.update(auth.user_id(), id, input).await?;

    info!(user_id = %auth.user_id(), transaction_id = %id, "Transaction updated");
    Ok(Json(transaction.into()))
}

/// DELETE `/transactions/{id}`
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = TransactionRepository::new(state.db());
    repo.delete(auth.user_id(), id).await?;

    info!(user_id = %auth.user_id(), transaction_id = %id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}
