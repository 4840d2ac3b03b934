//! Staff-only inspection and bulk actions.
//!
//! Bulk actions take `{"ids": [...]}` and answer with the number of rows
//! affected and a human-readable message. Unknown IDs are ignored.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{
    accounts::AccountResponse, auth::user_info, budgets::BudgetResponse,
    transactions::TransactionResponse,
};
use crate::{AppState, error::ApiResult, middleware::AuthUser, today};
use fintrack_core::{
    budget::period::DEFAULT_EXTENSION_DAYS,
    filters::{AmountRange, BudgetStatusFilter, DateRange},
    summary::BalanceSummary,
    transaction::{CategorySpending, TransactionSummary, TransactionType},
};
use fintrack_db::{
    AccountRepository, BudgetRepository, CategoryRepository, TransactionRepository,
    UserRepository,
    repositories::{BudgetError, transaction::AdminTransactionFilter},
};
use fintrack_shared::{
    AdminSiteConfig, AppError,
    auth::UserInfo,
    types::{PageRequest, PageResponse, format_currency},
};

/// Creates the admin routes. Callers must apply auth and staff middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/site", get(site))
        .route("/users", get(list_users))
        .route("/users/actions/activate", post(activate_users))
        .route("/users/actions/deactivate", post(deactivate_users))
        .route("/users/actions/export-summary", post(export_user_summary))
        .route("/accounts", get(list_accounts))
        .route(
            "/accounts/actions/recalculate-balance",
            post(recalculate_balances),
        )
        .route("/budgets", get(list_budgets))
        .route("/budgets/actions/reset-spent", post(reset_spent))
        .route("/budgets/actions/extend", post(extend_budgets))
        .route("/budgets/actions/duplicate", post(duplicate_budgets))
        .route("/budgets/actions/recalculate", post(recalculate_budgets))
        .route("/transactions", get(list_transactions))
        .route("/transactions/actions/mark-deposit", post(mark_deposit))
        .route("/transactions/actions/mark-withdrawal", post(mark_withdrawal))
        .route(
            "/transactions/actions/export-summary",
            post(export_transaction_summary),
        )
        .route("/categories/actions/unlink", post(unlink_categories))
        .route(
            "/categories/actions/spending-summary",
            post(category_spending_summary),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Selection for a bulk action.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    /// Selected row IDs.
    pub ids: Vec<Uuid>,
}

impl ActionRequest {
    fn selected(&self) -> ApiResult<&[Uuid]> {
        if self.ids.is_empty() {
            return Err(AppError::Validation(
                "Items must be selected in order to perform actions on them.".into(),
            )
            .into());
        }
        Ok(&self.ids)
    }
}

/// Outcome of a bulk action.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    /// Number of rows the action applied to.
    pub affected: u64,
    /// Message shown to the operator.
    pub message: String,
    /// Structured result, for actions that report figures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ActionResponse<()> {
    fn message(affected: u64, message: String) -> Self {
        Self {
            affected,
            message,
            data: None,
        }
    }
}

impl<T> ActionResponse<T> {
    fn with_data(affected: u64, message: String, data: T) -> Self {
        Self {
            affected,
            message,
            data: Some(data),
        }
    }
}

/// A user row in the admin list.
#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    /// Profile fields.
    #[serde(flatten)]
    pub user: UserInfo,
    /// First and last name, when set.
    pub full_name: Option<String>,
    /// Whether the user may sign in.
    pub is_active: bool,
    /// Number of accounts.
    pub account_count: u64,
    /// Number of transactions.
    pub transaction_count: u64,
    /// Sum of account balances.
    pub total_balance: Decimal,
}

/// Per-user figures reported by the export action.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    /// User ID.
    pub user: Uuid,
    /// Username.
    pub username: String,
    /// Balance and transaction totals.
    pub summary: BalanceSummary,
}

/// Per-account figures reported by the recalculate action.
#[derive(Debug, Serialize)]
pub struct AccountActivity {
    /// Account ID.
    pub account: Uuid,
    /// Account name.
    pub name: String,
    /// Stored balance.
    pub balance: Decimal,
    /// Deposit and withdrawal totals on the account.
    pub summary: TransactionSummary,
}

/// Per-category figures reported by the spending action.
#[derive(Debug, Serialize)]
pub struct CategorySpendingRow {
    /// Category ID.
    pub category: Uuid,
    /// Category name.
    pub name: String,
    /// Withdrawal totals.
    pub spending: CategorySpending,
}

/// Query parameters for the admin budget list.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetListQuery {
    /// One of `on_track`, `warning`, `over`, `active`, `ended`.
    pub status: Option<String>,
}

/// Query parameters for the admin transaction list.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
    /// `deposit` or `withdrawal`.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Amount bucket, e.g. `100-500`.
    pub amount_range: Option<String>,
    /// `today`, `week`, `month`, `quarter` or `year`.
    pub date_range: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
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

    fn filter(&self) -> ApiResult<AdminTransactionFilter> {
        let transaction_type = non_empty(self.transaction_type.as_deref())
            .map(str::parse::<TransactionType>)
            .transpose()?
            .map(Into::into);
        let amount_range = non_empty(self.amount_range.as_deref())
            .map(str::parse::<AmountRange>)
            .transpose()?;
        let occurred_from = non_empty(self.date_range.as_deref())
            .map(str::parse::<DateRange>)
            .transpose()?
            .map(|range| range.start_date(today()));

        Ok(AdminTransactionFilter {
            transaction_type,
            amount_range,
            occurred_from,
        })
    }
}

// ============================================================================
// Site
// ============================================================================

/// GET `/admin/site` - Branding strings for the admin UI.
async fn site(State(state): State<AppState>) -> Json<AdminSiteConfig> {
    Json((*state.admin_site).clone())
}

// ============================================================================
// Users
// ============================================================================

/// GET `/admin/users` - All users, newest first, with account figures.
async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<AdminUserResponse>>> {
    let page = page.normalized();
    let repo = UserRepository::new(state.db());
    let (users, total) = repo.list(&page).await?;

    let mut rows = Vec::with_capacity(users.len());
    for user in users {
        let stats = repo.stats(user.id).await?;
        let is_active = user.is_active;
        let info = user_info(user);
        rows.push(AdminUserResponse {
            full_name: info.full_name(),
            user: info,
            is_active,
            account_count: stats.account_count,
            transaction_count: stats.transaction_count,
            total_balance: stats.total_balance,
        });
    }

    Ok(Json(PageResponse::new(rows, page.page, page.per_page, total)))
}

async fn set_users_active(
    state: &AppState,
    auth: &AuthUser,
    request: &ActionRequest,
    active: bool,
) -> ApiResult<Json<ActionResponse<()>>> {
    let ids = request.selected()?;
    let affected = UserRepository::new(state.db())
        .set_active(ids, active)
        .await?;

    let verb = if active { "activated" } else { "deactivated" };
    info!(admin = %auth.username(), affected, verb, "Users updated");
    Ok(Json(ActionResponse::message(
        affected,
        format!("{affected} user(s) {verb}."),
    )))
}

/// POST `/admin/users/actions/activate`
async fn activate_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<()>>> {
    set_users_active(&state, &auth, &request, true).await
}

/// POST `/admin/users/actions/deactivate`
async fn deactivate_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<()>>> {
    set_users_active(&state, &auth, &request, false).await
}

/// POST `/admin/users/actions/export-summary` - Balance and totals per user.
async fn export_user_summary(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<Vec<UserSummary>>>> {
    let ids = request.selected()?;
    let users = UserRepository::new(state.db()).find_many(ids).await?;
    let accounts = AccountRepository::new(state.db());
    let transactions = TransactionRepository::new(state.db());

    let mut rows = Vec::with_capacity(users.len());
    for user in users {
        let balances = accounts.balances_for_user(user.id).await?;
        let entries = transactions.entries_for_user(user.id).await?;
        rows.push(UserSummary {
            user: user.id,
            username: user.username,
            summary: BalanceSummary::new(balances, entries),
        });
    }

    let message = rows
        .iter()
        .map(|row| {
            format!(
                "{}: Balance={}, Deposits={}, Withdrawals={}",
                row.username,
                format_currency(row.summary.total_balance),
                format_currency(row.summary.total_deposits),
                format_currency(row.summary.total_withdrawals),
            )
        })
        .collect::<Vec<_>>()
        .join(" | ");

    Ok(Json(ActionResponse::with_data(
        rows.len() as u64,
        message,
        rows,
    )))
}

// ============================================================================
// Accounts
// ============================================================================

/// GET `/admin/accounts` - Every account.
async fn list_accounts(State(state): State<AppState>) -> ApiResult<Json<Vec<AccountResponse>>> {
    let accounts = AccountRepository::new(state.db()).list_all().await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// POST `/admin/accounts/actions/recalculate-balance`
///
/// Reports deposit and withdrawal totals next to each stored balance.
/// Balances are not modified.
async fn recalculate_balances(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<Vec<AccountActivity>>>> {
    let ids = request.selected()?;
    let accounts = AccountRepository::new(state.db()).find_many(ids).await?;
    let transactions = TransactionRepository::new(state.db());

    let mut rows = Vec::with_capacity(accounts.len());
    for account in accounts {
        let entries = transactions.entries_for_account(account.id).await?;
        rows.push(AccountActivity {
            account: account.id,
            name: account.name,
            balance: account.balance,
            summary: TransactionSummary::from_entries(entries),
        });
    }

    let message = rows
        .iter()
        .map(|row| {
            format!(
                "{}: Deposits={}, Withdrawals={}, Net={}",
                row.name,
                format_currency(row.summary.total_deposits),
                format_currency(row.summary.total_withdrawals),
                format_currency(row.summary.net),
            )
        })
        .collect::<Vec<_>>()
        .join(" | ");

    Ok(Json(ActionResponse::with_data(
        rows.len() as u64,
        message,
        rows,
    )))
}

// ============================================================================
// Budgets
// ============================================================================

/// GET `/admin/budgets?status=` - Every budget with progress.
async fn list_budgets(
    State(state): State<AppState>,
    Query(query): Query<BudgetListQuery>,
) -> ApiResult<Json<Vec<BudgetResponse>>> {
    let status = non_empty(query.status.as_deref())
        .map(str::parse::<BudgetStatusFilter>)
        .transpose()?;

    let budgets = BudgetRepository::new(state.db()).list_all().await?;

    let today = today();
    let rows = budgets
        .into_iter()
        .map(|b| BudgetResponse::evaluate(b, today))
        .filter(|b| status.is_none_or(|s| s.matches(&b.progress)))
        .collect();

    Ok(Json(rows))
}

/// POST `/admin/budgets/actions/reset-spent`
async fn reset_spent(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<()>>> {
    let ids = request.selected()?;
    let affected = BudgetRepository::new(state.db()).reset_spent(ids).await?;

    info!(admin = %auth.username(), affected, "Budgets reset");
    Ok(Json(ActionResponse::message(
        affected,
        format!("{affected} budget(s) reset to zero spent."),
    )))
}

/// POST `/admin/budgets/actions/extend` - Push end dates out by 30 days.
async fn extend_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<()>>> {
    let ids = request.selected()?;
    let affected = BudgetRepository::new(state.db())
        .extend(ids, DEFAULT_EXTENSION_DAYS)
        .await?;

    info!(admin = %auth.username(), affected, "Budgets extended");
    Ok(Json(ActionResponse::message(
        affected,
        format!("{affected} budget(s) extended by 1 month."),
    )))
}

/// POST `/admin/budgets/actions/duplicate`
async fn duplicate_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<Vec<BudgetResponse>>>> {
    let ids = request.selected()?;
    let created = BudgetRepository::new(state.db())
        .duplicate_for_next_period(ids)
        .await?;

    let affected = created.len() as u64;
    info!(admin = %auth.username(), affected, "Budgets duplicated");

    let today = today();
    Ok(Json(ActionResponse::with_data(
        affected,
        format!("{affected} budget(s) duplicated for next period."),
        created
            .into_iter()
            .map(|b| BudgetResponse::evaluate(b, today))
            .collect(),
    )))
}

/// POST `/admin/budgets/actions/recalculate` - Rebuild spend from linked withdrawals.
async fn recalculate_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<Vec<BudgetResponse>>>> {
    let ids = request.selected()?;
    let repo = BudgetRepository::new(state.db());

    let today = today();
    let mut rows = Vec::with_capacity(ids.len());
    for &id in ids {
        match repo.recalculate_spent(id).await {
            Ok(budget) => rows.push(BudgetResponse::evaluate(budget, today)),
            Err(BudgetError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let affected = rows.len() as u64;
    info!(admin = %auth.username(), affected, "Budgets recalculated");
    Ok(Json(ActionResponse::with_data(
        affected,
        format!("{affected} budget(s) recalculated from linked withdrawals."),
        rows,
    )))
}

// ============================================================================
// Transactions
// ============================================================================

/// GET `/admin/transactions?type&amount_range&date_range` - Every transaction, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionListQuery>,
) -> ApiResult<Json<PageResponse<TransactionResponse>>> {
    let page = query.page();
    let filter = query.filter()?;

    let (rows, total) = TransactionRepository::new(state.db())
        .list_all(filter, &page)
        .await?;

    Ok(Json(
        PageResponse::new(rows, page.page, page.per_page, total).map(TransactionResponse::from),
    ))
}

async fn retype_transactions(
    state: &AppState,
    auth: &AuthUser,
    request: &ActionRequest,
    kind: TransactionType,
) -> ApiResult<Json<ActionResponse<()>>> {
    let ids = request.selected()?;
    let affected = TransactionRepository::new(state.db())
        .set_type(ids, kind.into())
        .await?;

    info!(admin = %auth.username(), affected, kind = %kind, "Transactions retyped");
    Ok(Json(ActionResponse::message(
        affected,
        format!("{affected} transaction(s) marked as {kind}."),
    )))
}

/// POST `/admin/transactions/actions/mark-deposit`
async fn mark_deposit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<()>>> {
    retype_transactions(&state, &auth, &request, TransactionType::Deposit).await
}

/// POST `/admin/transactions/actions/mark-withdrawal`
async fn mark_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<()>>> {
    retype_transactions(&state, &auth, &request, TransactionType::Withdrawal).await
}

/// POST `/admin/transactions/actions/export-summary`
async fn export_transaction_summary(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<TransactionSummary>>> {
    let ids = request.selected()?;
    let summary = TransactionRepository::new(state.db()).summary(ids).await?;

    let message = format!(
        "Selected {} transactions: Deposits={}, Withdrawals={}, Net={}",
        summary.count,
        format_currency(summary.total_deposits),
        format_currency(summary.total_withdrawals),
        format_currency(summary.net),
    );

    Ok(Json(ActionResponse::with_data(summary.count, message, summary)))
}

// ============================================================================
// Categories
// ============================================================================

/// POST `/admin/categories/actions/unlink` - Detach categories from their budgets.
async fn unlink_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<()>>> {
    let ids = request.selected()?;
    let affected = CategoryRepository::new(state.db())
        .unlink_from_budget(ids)
        .await?;

    info!(admin = %auth.username(), affected, "Categories unlinked");
    Ok(Json(ActionResponse::message(
        affected,
        format!("{affected} category(ies) unlinked from budgets."),
    )))
}

/// POST `/admin/categories/actions/spending-summary`
async fn category_spending_summary(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> ApiResult<Json<ActionResponse<Vec<CategorySpendingRow>>>> {
    let ids = request.selected()?;
    let repo = CategoryRepository::new(state.db());
    let categories = repo.find_many(ids).await?;

    let mut rows = Vec::with_capacity(categories.len());
    for category in categories {
        let spending = repo.spending(category.id).await?;
        rows.push(CategorySpendingRow {
            category: category.id,
            name: category.name,
            spending,
        });
    }

    let total: Decimal = rows.iter().map(|row| row.spending.total_spent).sum();
    let message = std::iter::once(format!(
        "Total spending across selected categories: {}",
        format_currency(total)
    ))
    .chain(
        rows.iter()
            .map(|row| format!("{}: {}", row.name, format_currency(row.spending.total_spent))),
    )
    .collect::<Vec<_>>()
    .join(" | ");

    Ok(Json(ActionResponse::with_data(
        rows.len() as u64,
        message,
        rows,
    )))
}
