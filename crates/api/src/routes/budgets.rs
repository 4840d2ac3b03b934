//! Budget routes.
//!
//! Every budget is returned with its progress as of today's date, so
//! clients never compute status bands themselves.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiResult, middleware::AuthUser, today};
use fintrack_core::budget::{BudgetProgress, BudgetService};
use fintrack_db::{BudgetRepository, entities::budgets, repositories::budget::BudgetInput};

/// Creates the budget routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{id}/progress", get(get_progress))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or replacing a budget.
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    /// Account the budget belongs to.
    pub account: Uuid,
    /// Budget name.
    pub name: String,
    /// Planned amount for the period.
    pub total_amount: Decimal,
    /// Amount already spent.
    #[serde(default)]
    pub spent_amount: Decimal,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
}

impl BudgetRequest {
    fn into_input(self) -> ApiResult<BudgetInput> {
        let name = self.name.trim().to_string();
        BudgetService::validate(
            &name,
            self.total_amount,
            self.spent_amount,
            self.start_date,
            self.end_date,
        )?;

        Ok(BudgetInput {
            account_id: self.account,
            name,
            total_amount: self.total_amount,
            spent_amount: self.spent_amount,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// A budget with its evaluated progress.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// Budget ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user: Uuid,
    /// Account ID.
    pub account: Uuid,
    /// Budget name.
    pub name: String,
    /// Planned amount.
    pub total_amount: Decimal,
    /// Amount spent so far.
    pub spent_amount: Decimal,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Progress as of today.
    pub progress: BudgetProgress,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Last modification time.
    pub updated_at: DateTime<FixedOffset>,
}

impl BudgetResponse {
    /// Builds the response, evaluating progress as of `today`.
    pub(crate) fn evaluate(budget: budgets::Model, today: NaiveDate) -> Self {
        let progress = BudgetProgress::evaluate(&budget.snapshot(), today).rounded();
        Self {
            id: budget.id,
            user: budget.user_id,
            account: budget.account_id,
            name: budget.name,
            total_amount: budget.total_amount,
            spent_amount: budget.spent_amount,
            start_date: budget.start_date,
            end_date: budget.end_date,
            progress,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/budgets` - The caller's budgets, latest period first.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<BudgetResponse>>> {
    let repo = BudgetRepository::new(state.db());
    let budgets = repo.list(auth.user_id()).await?;

    let today = today();
    Ok(Json(
        budgets
            .into_iter()
            .map(|b| BudgetResponse::evaluate(b, today))
            .collect(),
    ))
}

/// POST `/budgets`
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_input()?;

    let repo = BudgetRepository::new(state.db());
    let budget = repo.create(auth.user_id(), input).await?;

    info!(
        user_id = %auth.user_id(),
        budget_id = %budget.id,
        total = %budget.total_amount,
        "Budget created"
    );
    Ok((
        StatusCode::CREATED,
        Json(BudgetResponse::evaluate(budget, today())),
    ))
}

/// GET `/budgets/{id}`
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BudgetResponse>> {
    let repo = BudgetRepository::new(state.db());
    let budget = repo.get(auth.user_id(), id).await?;

    Ok(Json(BudgetResponse::evaluate(budget, today())))
}

/// PUT `/budgets/{id}`
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetRequest>,
) -> ApiResult<Json<BudgetResponse>> {
    let input = payload.into_input()?;

    let repo = BudgetRepository::new(state.db());
    let budget = repo.update(auth.user_id(), id, input).await?;

    info!(user_id = %auth.user_id(), budget_id = %id, "Budget updated");
    Ok(Json(BudgetResponse::evaluate(budget, today())))
}

/// DELETE `/budgets/{id}` - Removes the budget and the categories linked to it.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = BudgetRepository::new(state.db());
    repo.delete(auth.user_id(), id).await?;

    info!(user_id = %auth.user_id(), budget_id = %id, "Budget deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/budgets/{id}/progress` - Evaluator output only.
async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BudgetProgress>> {
    let repo = BudgetRepository::new(state.db());
    let budget = repo.get(auth.user_id(), id).await?;

    Ok(Json(
        BudgetProgress::evaluate(&budget.snapshot(), today()).rounded(),
    ))
}
