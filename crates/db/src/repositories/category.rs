//! Category repository for category database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use fintrack_core::transaction::CategorySpending;
use fintrack_shared::AppError;

use super::spend::move_category_spend;
use crate::entities::{budgets, categories, sea_orm_active_enums::TransactionType, transactions};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found (or owned by another user).
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Linked budget not found (or owned by another user).
    #[error("Budget not found: {0}")]
    BudgetNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => Self::NotFound("Category not found".to_string()),
            CategoryError::BudgetNotFound(_) => Self::Validation("Budget not found".to_string()),
            CategoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Writable category fields.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Budget whose spend this category feeds.
    pub budget_id: Option<Uuid>,
}

async fn ensure_budget<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    budget_id: Option<Uuid>,
) -> Result<(), CategoryError> {
    let Some(budget_id) = budget_id else {
        return Ok(());
    };

    budgets::Entity::find_by_id(budget_id)
        .filter(budgets::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or(CategoryError::BudgetNotFound(budget_id))
}

async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    id: Uuid,
) -> Result<categories::Model, CategoryError> {
    categories::Entity::find_by_id(id)
        .filter(categories::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or(CategoryError::NotFound(id))
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category, optionally linked to one of the user's budgets.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: CategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        ensure_budget(&self.db, user_id, input.budget_id).await?;

        let now = Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(input.name),
            description: Set(input.description),
            budget_id: Set(input.budget_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Gets one of the user's categories.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<categories::Model, CategoryError> {
        find_owned(&self.db, user_id, id).await
    }

    /// Lists the user's categories by name.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Replaces the writable fields of a category.
    ///
    /// Relinking moves the category's past withdrawals from the old budget's
    /// spend to the new one.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let txn = self.db.begin().await?;

        let category = find_owned(&txn, user_id, id).await?;
        if category.budget_id != input.budget_id {
            ensure_budget(&txn, user_id, input.budget_id).await?;
            move_category_spend(&txn, id, category.budget_id, input.budget_id).await?;
        }

        let mut active: categories::ActiveModel = category.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.budget_id = Set(input.budget_id);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a category and its transactions, taking their withdrawals
    /// off the linked budget.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), CategoryError> {
        let txn = self.db.begin().await?;

        let category = find_owned(&txn, user_id, id).await?;
        move_category_spend(&txn, id, category.budget_id, None).await?;

        categories::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    /// Loads categories by ID regardless of owner (admin).
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(categories::Entity::find()
            .filter(categories::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Clears the budget link; returns the number of categories changed.
    ///
    /// Each linked category's withdrawals come off its budget's spend.
    pub async fn unlink_from_budget(&self, ids: &[Uuid]) -> Result<u64, CategoryError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let txn = self.db.begin().await?;

        let linked = categories::Entity::find()
            .filter(categories::Column::Id.is_in(ids.iter().copied()))
            .filter(categories::Column::BudgetId.is_not_null())
            .all(&txn)
            .await?;

        for category in linked {
            move_category_spend(&txn, category.id, category.budget_id, None).await?;
        }

        let result = categories::Entity::update_many()
            .col_expr(categories::Column::BudgetId, Expr::value(Option::<Uuid>::None))
            .filter(categories::Column::Id.is_in(ids.iter().copied()))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(result.rows_affected)
    }

    /// Withdrawal totals for a category.
    pub async fn spending(&self, id: Uuid) -> Result<CategorySpending, CategoryError> {
        let amounts: Vec<rust_decimal::Decimal> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Amount)
            .filter(transactions::Column::CategoryId.eq(id))
            .filter(transactions::Column::TransactionType.eq(TransactionType::Withdrawal))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(CategorySpending::from_withdrawals(amounts))
    }
}
