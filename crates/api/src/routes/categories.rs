//! Category routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use fintrack_core::{transaction::CategorySpending, validation::validate_name};
use fintrack_db::{
    CategoryRepository, entities::categories, repositories::category::CategoryInput,
};

/// Creates the category routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/categories/{id}/spending", get(get_spending))
}

/// Request body for creating or replacing a category.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    /// Category name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Budget that withdrawals in this category count against.
    #[serde(default)]
    pub budget: Option<Uuid>,
}

impl CategoryRequest {
    fn into_input(self) -> ApiResult<CategoryInput> {
        let name = self.name.trim().to_string();
        validate_name(&name)?;

        Ok(CategoryInput {
            name,
            description: self.description.filter(|d| !d.trim().is_empty()),
            budget_id: self.budget,
        })
    }
}

/// A category as returned by the API.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    /// Category ID.
    pub id: Uuid,
    /// Owning user ID.
    pub user: Uuid,
    /// Category name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Linked budget, if any.
    pub budget: Option<Uuid>,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Last modification time.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<categories::Model> for CategoryResponse {
    fn from(category: categories::Model) -> Self {
        Self {
            id: category.id,
            user: category.user_id,
            name: category.name,
            description: category.description,
            budget: category.budget_id,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<CategoryResponse>>> {
    let repo = CategoryRepository::new(state.db());
    let categories = repo.list(auth.user_id()).await?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = payload.into_input()?;

    let repo = CategoryRepository::new(state.db());
    let category = repo.create(auth.user_id(), input).await?;

    info!(user_id = %auth.user_id(), category_id = %category.id, "Category created");
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CategoryResponse>> {
    let repo = CategoryRepository::new(state.db());
    let category = repo.get(auth.user_id(), id).await?;

    Ok(Json(category.into()))
}

async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    let input = payload.into_input()?;

    let repo = CategoryRepository::new(state.db());
    let category = repo.update(auth.user_id(), id, input).await?;

    info!(user_id = %auth.user_id(), category_id = %id, "Category updated");
    Ok(Json(category.into()))
}

async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = CategoryRepository::new(state.db());
    repo.delete(auth.user_id(), id).await?;

    info!(user_id = %auth.user_id(), category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/categories/{id}/spending` - Withdrawal totals for the category.
async fn get_spending(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CategorySpending>> {
    let repo = CategoryRepository::new(state.db());
    repo.get(auth.user_id(), id).await?;

    Ok(Json(repo.spending(id).await?))
}
