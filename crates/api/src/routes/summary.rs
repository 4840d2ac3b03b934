//! Balance summary route.

use axum::{Json, Router, extract::State, routing::get};

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::summary::BalanceSummary;
use fintrack_db::{AccountRepository, TransactionRepository};

/// Creates the balance summary route (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new().route("/balance_summary", get(balance_summary))
}

/// GET `/balance_summary` - Balances and deposit/withdrawal totals for the caller.
async fn balance_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<BalanceSummary>> {
    let balances = AccountRepository::new(state.db())
        .balances_for_user(auth.user_id())
        .await?;
    let entries = TransactionRepository::new(state.db())
        .entries_for_user(auth.user_id())
        .await?;

    Ok(Json(BalanceSummary::new(balances, entries)))
}
