//! Account repository for account database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use fintrack_shared::AppError;

use super::spend::{account_spend_by_budget, adjust_spent};
use crate::entities::accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found (or owned by another user).
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => Self::NotFound("Account not found".to_string()),
            AccountError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Writable account fields.
#[derive(Debug, Clone)]
pub struct AccountInput {
    /// Display name.
    pub name: String,
    /// Current balance.
    pub balance: Decimal,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account for a user.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: AccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(input.name),
            balance: Set(input.balance),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Gets one of the user's accounts.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Lists the user's accounts by name.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Replaces the writable fields of an account.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: AccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.get(user_id, id).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.name = Set(input.name);
        active.balance = Set(input.balance);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account together with its budgets and transactions.
    ///
    /// Withdrawals that counted against budgets on other accounts come off
    /// those budgets' spend.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AccountError> {
        let txn = self.db.begin().await?;

        accounts::Entity::find_by_id(id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        for (budget_id, total) in account_spend_by_budget(&txn, id).await? {
            adjust_spent(&txn, budget_id, -total).await?;
        }

        accounts::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(account_id = %id, "Account deleted");
        Ok(())
    }

    /// Lists every account (admin).
    pub async fn list_all(&self) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .order_by_asc(accounts::Column::UserId)
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Loads accounts by ID regardless of owner (admin).
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Balances of all the user's accounts.
    pub async fn balances_for_user(&self, user_id: Uuid) -> Result<Vec<Decimal>, AccountError> {
        Ok(self
            .list(user_id)
            .await?
            .into_iter()
            .map(|a| a.balance)
            .collect())
    }
}
