//! Budget repository for budget database operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use fintrack_core::budget::period::{duplicate_name, extend_end_date, next_period};
use fintrack_shared::AppError;

use crate::entities::{
    accounts, budgets, categories, sea_orm_active_enums::TransactionType, transactions,
};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found (or owned by another user).
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// Account not found (or owned by another user).
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => Self::NotFound("Budget not found".to_string()),
            BudgetError::AccountNotFound(_) => Self::Validation("Account not found".to_string()),
            BudgetError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Writable budget fields.
#[derive(Debug, Clone)]
pub struct BudgetInput {
    /// Account the budget draws from.
    pub account_id: Uuid,
    /// Display name.
    pub name: String,
    /// Budgeted ceiling.
    pub total_amount: Decimal,
    /// Accumulated spend.
    pub spent_amount: Decimal,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
}

/// Budget repository for CRUD and admin bulk operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_account(&self, user_id: Uuid, account_id: Uuid) -> Result<(), BudgetError> {
        accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(BudgetError::AccountNotFound(account_id))
    }

    /// Creates a budget on one of the user's accounts.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: BudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        self.ensure_account(user_id, input.account_id).await?;

        let now = Utc::now().into();
        let budget = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(input.account_id),
            name: Set(input.name),
            total_amount: Set(input.total_amount),
            spent_amount: Set(input.spent_amount),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(budget.insert(&self.db).await?)
    }

    /// Gets one of the user's budgets.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<budgets::Model, BudgetError> {
        budgets::Entity::find_by_id(id)
            .filter(budgets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(id))
    }

    /// Lists the user's budgets, latest period first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<budgets::Model>, BudgetError> {
        Ok(budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::StartDate)
            .order_by_asc(budgets::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Replaces the writable fields of a budget.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: BudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let budget = self.get(user_id, id).await?;
        if budget.account_id != input.account_id {
            self.ensure_account(user_id, input.account_id).await?;
        }

        let mut active: budgets::ActiveModel = budget.into();
        active.account_id = Set(input.account_id);
        active.name = Set(input.name);
        active.total_amount = Set(input.total_amount);
        active.spent_amount = Set(input.spent_amount);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget and its categories.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), BudgetError> {
        let result = budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(id))
            .filter(budgets::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(BudgetError::NotFound(id));
        }
        Ok(())
    }

    /// Lists every budget (admin).
    pub async fn list_all(&self) -> Result<Vec<budgets::Model>, BudgetError> {
        Ok(budgets::Entity::find()
            .order_by_desc(budgets::Column::StartDate)
            .order_by_asc(budgets::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Sets `spent_amount` to zero; returns the number of budgets changed.
    pub async fn reset_spent(&self, ids: &[Uuid]) -> Result<u64, BudgetError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = budgets::Entity::update_many()
            .col_expr(budgets::Column::SpentAmount, Expr::value(Decimal::ZERO))
            .filter(budgets::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;

        info!(count = result.rows_affected, "Budgets reset");
        Ok(result.rows_affected)
    }

    /// Pushes each budget's end date out by `days`.
    pub async fn extend(&self, ids: &[Uuid], days: u64) -> Result<u64, BudgetError> {
        let txn = self.db.begin().await?;

        let found = budgets::Entity::find()
            .filter(budgets::Column::Id.is_in(ids.iter().copied()))
            .all(&txn)
            .await?;

        let mut affected = 0;
        for budget in found {
            let end_date = extend_end_date(budget.end_date, days);
            let mut active: budgets::ActiveModel = budget.into();
            active.end_date = Set(end_date);
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?;
            affected += 1;
        }

        txn.commit().await?;
        Ok(affected)
    }

    /// Copies each budget into the period that follows it, with zero spend.
    pub async fn duplicate_for_next_period(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<budgets::Model>, BudgetError> {
        let txn = self.db.begin().await?;

        let found = budgets::Entity::find()
            .filter(budgets::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(budgets::Column::Name)
            .all(&txn)
            .await?;

        let now = Utc::now().into();
        let mut created = Vec::with_capacity(found.len());
        for budget in found {
            let (start_date, end_date) = next_period(budget.start_date, budget.end_date);
            let copy = budgets::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(budget.user_id),
                account_id: Set(budget.account_id),
                name: Set(duplicate_name(&budget.name)),
                total_amount: Set(budget.total_amount),
                spent_amount: Set(Decimal::ZERO),
                start_date: Set(start_date),
                end_date: Set(end_date),
                created_at: Set(now),
                updated_at: Set(now),
            };
            created.push(copy.insert(&txn).await?);
        }

        txn.commit().await?;
        Ok(created)
    }

    /// Sum of withdrawals in categories linked to a budget.
    pub async fn linked_withdrawals(&self, id: Uuid) -> Result<Decimal, BudgetError> {
        let amounts: Vec<Decimal> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::Amount)
            .join(
                sea_orm::JoinType::InnerJoin,
                transactions::Relation::Categories.def(),
            )
            .filter(categories::Column::BudgetId.eq(id))
            .filter(transactions::Column::TransactionType.eq(TransactionType::Withdrawal))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(amounts.into_iter().sum())
    }

    /// Recomputes `spent_amount` from linked withdrawals.
    pub async fn recalculate_spent(&self, id: Uuid) -> Result<budgets::Model, BudgetError> {
        let budget = budgets::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(id))?;

        let spent = self.linked_withdrawals(id).await?;

        let mut active: budgets::ActiveModel = budget.into();
        active.spent_amount = Set(spent);
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        info!(budget_id = %id, spent = %spent, "Budget spend recalculated");
        Ok(updated)
    }
}
