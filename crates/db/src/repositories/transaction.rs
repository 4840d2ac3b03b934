//! Transaction repository.
//!
//! Every write keeps derived figures in step with the row: a deposit raises
//! its account balance, a withdrawal lowers it and, when its category is
//! linked to a budget, raises that budget's `spent_amount`. The row write and
//! these adjustments share one database transaction.

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use fintrack_core::{
    filters::AmountRange,
    transaction::{TransactionSummary, TransactionType as CoreTransactionType},
};
use fintrack_shared::{AppError, types::PageRequest};

use super::spend::adjust_spent;
use crate::entities::{accounts, categories, sea_orm_active_enums::TransactionType, transactions};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found (or owned by another user).
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Account not found (or owned by another user).
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Category not found (or owned by another user).
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) => Self::NotFound("Transaction not found".to_string()),
            TransactionError::AccountNotFound(_) => {
                Self::Validation("Account not found".to_string())
            }
            TransactionError::CategoryNotFound(_) => {
                Self::Validation("Category not found".to_string())
            }
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Writable transaction fields.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// Account the money moves on.
    pub account_id: Uuid,
    /// Optional spending category.
    pub category_id: Option<Uuid>,
    /// Deposit or withdrawal.
    pub transaction_type: TransactionType,
    /// Positive amount.
    pub amount: Decimal,
    /// Free text, may be empty.
    pub description: String,
}

/// Filters for a user's transaction list.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// Only this type.
    pub transaction_type: Option<TransactionType>,
    /// Only this account.
    pub account_id: Option<Uuid>,
    /// Only this category.
    pub category_id: Option<Uuid>,
}

/// Filters for the admin transaction list.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminTransactionFilter {
    /// Only this type.
    pub transaction_type: Option<TransactionType>,
    /// Only amounts in this bucket.
    pub amount_range: Option<AmountRange>,
    /// Only transactions on or after this day (UTC).
    pub occurred_from: Option<NaiveDate>,
}

/// Balance and budget adjustments caused by one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Effect {
    account_id: Uuid,
    budget_id: Option<Uuid>,
    balance: Decimal,
    spent: Decimal,
}

impl Effect {
    fn reversed(self) -> Self {
        Self {
            balance: -self.balance,
            spent: -self.spent,
            ..self
        }
    }
}

async fn effect_of<C: ConnectionTrait>(
    conn: &C,
    transaction: &transactions::Model,
) -> Result<Effect, DbErr> {
    let kind = CoreTransactionType::from(transaction.transaction_type);

    let budget_id = match (kind, transaction.category_id) {
        (CoreTransactionType::Withdrawal, Some(category_id)) => {
            categories::Entity::find_by_id(category_id)
                .one(conn)
                .await?
                .and_then(|c| c.budget_id)
        }
        _ => None,
    };

    Ok(Effect {
        account_id: transaction.account_id,
        budget_id,
        balance: kind.signed(transaction.amount),
        spent: kind.spend(transaction.amount),
    })
}

async fn apply<C: ConnectionTrait>(conn: &C, effect: Effect) -> Result<(), DbErr> {
    if !effect.balance.is_zero() {
        accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(effect.balance),
            )
            .filter(accounts::Column::Id.eq(effect.account_id))
            .exec(conn)
            .await?;
    }

    match effect.budget_id {
        Some(budget_id) => adjust_spent(conn, budget_id, effect.spent).await,
        None => Ok(()),
    }
}

async fn ensure_account<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    account_id: Uuid,
) -> Result<(), TransactionError> {
    accounts::Entity::find_by_id(account_id)
        .filter(accounts::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or(TransactionError::AccountNotFound(account_id))
}

async fn ensure_category<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    category_id: Option<Uuid>,
) -> Result<(), TransactionError> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    categories::Entity::find_by_id(category_id)
        .filter(categories::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or(TransactionError::CategoryNotFound(category_id))
}

async fn fetch_page(
    db: &DatabaseConnection,
    query: Select<transactions::Entity>,
    page: &PageRequest,
) -> Result<(Vec<transactions::Model>, u64), DbErr> {
    let page = page.normalized();
    let total = query.clone().count(db).await?;
    let items = query
        .order_by_desc(transactions::Column::OccurredAt)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await?;

    Ok((items, total))
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a transaction and applies its balance and budget effects.
    pub async fn create(
        &self,
        user_id: Uuid,
        input: TransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;

        ensure_account(&txn, user_id, input.account_id).await?;
        ensure_category(&txn, user_id, input.category_id).await?;

        let now = Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            account_id: Set(input.account_id),
            category_id: Set(input.category_id),
            transaction_type: Set(input.transaction_type),
            amount: Set(input.amount),
            description: Set(input.description),
            occurred_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let effect = effect_of(&txn, &transaction).await?;
        apply(&txn, effect).await?;

        txn.commit().await?;

        info!(
            transaction_id = %transaction.id,
            account_id = %transaction.account_id,
            amount = %transaction.amount,
            "Transaction recorded"
        );
        Ok(transaction)
    }

    /// Gets one of the user's transactions.
    pub async fn get(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Lists the user's transactions, newest first.
    pub async fn list(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), TransactionError> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));

        if let Some(kind) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(kind));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }

        Ok(fetch_page(&self.db, query, page).await?)
    }

    /// Lists every transaction (admin), newest first.
    pub async fn list_all(
        &self,
        filter: AdminTransactionFilter,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), TransactionError> {
        let mut query = transactions::Entity::find();

        if let Some(kind) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(kind));
        }
        if let Some(range) = filter.amount_range {
            let (lower, upper) = range.bounds();
            if let Some(lower) = lower {
                query = query.filter(transactions::Column::Amount.gt(lower));
            }
            if let Some(upper) = upper {
                query = query.filter(transactions::Column::Amount.lte(upper));
            }
        }
        if let Some(from) = filter.occurred_from {
            let since = from.and_time(NaiveTime::MIN).and_utc();
            query = query.filter(transactions::Column::OccurredAt.gte(since));
        }

        Ok(fetch_page(&self.db, query, page).await?)
    }

    /// Replaces a transaction, reverting its old effect and applying the new one.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        input: TransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;

        let existing = transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        if existing.account_id != input.account_id {
            ensure_account(&txn, user_id, input.account_id).await?;
        }
        if existing.category_id != input.category_id {
            ensure_category(&txn, user_id, input.category_id).await?;
        }

        let old_effect = effect_of(&txn, &existing).await?;
        apply(&txn, old_effect.reversed()).await?;

        let mut active: transactions::ActiveModel = existing.into();
        active.account_id = Set(input.account_id);
        active.category_id = Set(input.category_id);
        active.transaction_type = Set(input.transaction_type);
        active.amount = Set(input.amount);
        active.description = Set(input.description);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        let new_effect = effect_of(&txn, &updated).await?;
        apply(&txn, new_effect).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a transaction and reverts its effect.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), TransactionError> {
        let txn = self.db.begin().await?;

        let existing = transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id))?;

        let effect = effect_of(&txn, &existing).await?;
        apply(&txn, effect.reversed()).await?;

        transactions::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(transaction_id = %id, "Transaction deleted");
        Ok(())
    }

    /// Retypes transactions (admin); returns how many were selected.
    ///
    /// Rows already of `kind` are left untouched but still counted.
    pub async fn set_type(&self, ids: &[Uuid], kind: TransactionType) -> Result<u64, TransactionError> {
        let txn = self.db.begin().await?;

        let found = transactions::Entity::find()
            .filter(transactions::Column::Id.is_in(ids.iter().copied()))
            .all(&txn)
            .await?;
        let selected = found.len() as u64;

        for existing in found.into_iter().filter(|t| t.transaction_type != kind) {
            let old_effect = effect_of(&txn, &existing).await?;
            apply(&txn, old_effect.reversed()).await?;

            let mut active: transactions::ActiveModel = existing.into();
            active.transaction_type = Set(kind);
            active.updated_at = Set(Utc::now().into());
            let updated = active.update(&txn).await?;

            let new_effect = effect_of(&txn, &updated).await?;
            apply(&txn, new_effect).await?;
        }

        txn.commit().await?;
        Ok(selected)
    }

    /// `(type, amount)` of every transaction the user owns.
    pub async fn entries_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(CoreTransactionType, Decimal)>, TransactionError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|t| (CoreTransactionType::from(t.transaction_type), t.amount))
            .collect())
    }

    /// `(type, amount)` of every transaction on an account (admin).
    pub async fn entries_for_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<(CoreTransactionType, Decimal)>, TransactionError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|t| (CoreTransactionType::from(t.transaction_type), t.amount))
            .collect())
    }

    /// Totals over the selected transactions (admin).
    pub async fn summary(&self, ids: &[Uuid]) -> Result<TransactionSummary, TransactionError> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;

        Ok(TransactionSummary::from_entries(
            rows.into_iter()
                .map(|t| (CoreTransactionType::from(t.transaction_type), t.amount)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::budgets;
    use crate::repositories::spend::testing::{bound, statement_log};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn account(user_id: Uuid) -> accounts::Model {
        let now = Utc::now().into();
        accounts::Model {
            id: Uuid::new_v4(),
            user_id,
            name: "Checking".to_string(),
            balance: dec!(100.00),
            created_at: now,
            updated_at: now,
        }
    }

    fn stored(user_id: Uuid, account_id: Uuid, kind: TransactionType) -> transactions::Model {
        let now = Utc::now().into();
        transactions::Model {
            id: Uuid::new_v4(),
            user_id,
            account_id,
            category_id: None,
            transaction_type: kind,
            amount: dec!(40.00),
            description: "Paycheck".to_string(),
            occurred_at: now,
            updated_at: now,
        }
    }

    fn linked_category(user_id: Uuid, budget_id: Uuid) -> categories::Model {
        let now = Utc::now().into();
        categories::Model {
            id: Uuid::new_v4(),
            user_id,
            name: "Groceries".to_string(),
            description: None,
            budget_id: Some(budget_id),
            created_at: now,
            updated_at: now,
        }
    }

    fn budget(user_id: Uuid, account_id: Uuid, spent: Decimal) -> budgets::Model {
        let now = Utc::now().into();
        budgets::Model {
            id: Uuid::new_v4(),
            user_id,
            account_id,
            name: "Groceries".to_string(),
            total_amount: dec!(500.00),
            spent_amount: spent,
            start_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    fn with_spent(budget: &budgets::Model, spent: Decimal) -> budgets::Model {
        budgets::Model {
            spent_amount: spent,
            ..budget.clone()
        }
    }

    fn one_row() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[test]
    fn test_effect_reversal() {
        let effect = Effect {
            account_id: Uuid::new_v4(),
            budget_id: Some(Uuid::new_v4()),
            balance: dec!(-25.00),
            spent: dec!(25.00),
        };
        let reversed = effect.reversed();

        assert_eq!(reversed.balance, dec!(25.00));
        assert_eq!(reversed.spent, dec!(-25.00));
        assert_eq!(reversed.account_id, effect.account_id);
        assert_eq!(reversed.reversed(), effect);
    }

    #[tokio::test]
    async fn test_create_deposit() {
        let user_id = Uuid::new_v4();
        let account = account(user_id);
        let row = stored(user_id, account.id, TransactionType::Deposit);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![account.clone()]])
            .append_query_results([vec![row.clone()]])
            .append_exec_results([one_row()])
            .into_connection();
        let repo = TransactionRepository::new(db);

        let created = repo
            .create(
                user_id,
                TransactionInput {
                    account_id: account.id,
                    category_id: None,
                    transaction_type: TransactionType::Deposit,
                    amount: dec!(40.00),
                    description: "Paycheck".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created, row);
    }

    #[tokio::test]
    async fn test_create_linked_withdrawal_raises_budget_spend() {
        let user_id = Uuid::new_v4();
        let account = account(user_id);
        let budget = budget(user_id, account.id, dec!(100.00));
        let category = linked_category(user_id, budget.id);
        let mut row = stored(user_id, account.id, TransactionType::Withdrawal);
        row.category_id = Some(category.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![account.clone()]])
            .append_query_results([vec![category.clone()]])
            .append_query_results([vec![row.clone()]])
            .append_query_results([vec![category.clone()]])
            .append_query_results([vec![budget.clone()], vec![with_spent(&budget, dec!(140.00))]])
            .append_exec_results([one_row()])
            .into_connection();
        let repo = TransactionRepository::new(db.clone());

        let created = repo
            .create(
                user_id,
                TransactionInput {
                    account_id: account.id,
                    category_id: Some(category.id),
                    transaction_type: TransactionType::Withdrawal,
                    amount: dec!(40.00),
                    description: "Paycheck".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created, row);

        let log = statement_log(db);
        assert!(log.contains("FOR UPDATE"));
        assert!(log.contains("spent_amount"));
        assert!(log.contains(&bound(dec!(140.00))));
    }

    #[tokio::test]
    async fn test_delete_linked_withdrawal_reverts_budget_spend() {
        let user_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let budget = budget(user_id, account_id, dec!(100.00));
        let category = linked_category(user_id, budget.id);
        let mut row = stored(user_id, account_id, TransactionType::Withdrawal);
        row.category_id = Some(category.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .append_query_results([vec![category]])
            .append_query_results([vec![budget.clone()], vec![with_spent(&budget, dec!(60.00))]])
            .append_exec_results([one_row(), one_row()])
            .into_connection();
        let repo = TransactionRepository::new(db.clone());

        repo.delete(user_id, row.id).await.unwrap();

        let log = statement_log(db);
        assert!(log.contains("FOR UPDATE"));
        assert!(log.contains(&bound(dec!(60.00))));
        assert!(log.contains("DELETE FROM"));
    }

    #[tokio::test]
    async fn test_retype_linked_withdrawal_reverts_budget_spend() {
        let user_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let budget = budget(user_id, account_id, dec!(100.00));
        let category = linked_category(user_id, budget.id);
        let mut row = stored(user_id, account_id, TransactionType::Withdrawal);
        row.category_id = Some(category.id);
        let mut retyped = row.clone();
        retyped.transaction_type = TransactionType::Deposit;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row.clone()]])
            .append_query_results([vec![category]])
            .append_query_results([vec![budget.clone()], vec![with_spent(&budget, dec!(60.00))]])
            .append_query_results([vec![retyped]])
            .append_exec_results([one_row(), one_row()])
            .into_connection();
        let repo = TransactionRepository::new(db.clone());

        let count = repo
            .set_type(&[row.id], TransactionType::Deposit)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let log = statement_log(db);
        assert!(log.contains(&bound(dec!(60.00))));
    }

    #[tokio::test]
    async fn test_create_on_foreign_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();
        let repo = TransactionRepository::new(db);
        let account_id = Uuid::new_v4();

        let result = repo
            .create(
                Uuid::new_v4(),
                TransactionInput {
                    account_id,
                    category_id: None,
                    transaction_type: TransactionType::Withdrawal,
                    amount: dec!(5.00),
                    description: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(TransactionError::AccountNotFound(id)) if id == account_id));
    }

    #[tokio::test]
    async fn test_delete_missing_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<transactions::Model>::new()])
            .into_connection();
        let repo = TransactionRepository::new(db);

        let result = repo.delete(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(TransactionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_summary_over_selection() {
        let user_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let deposit = stored(user_id, account_id, TransactionType::Deposit);
        let mut withdrawal = stored(user_id, account_id, TransactionType::Withdrawal);
        withdrawal.amount = dec!(15.50);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![deposit.clone(), withdrawal.clone()]])
            .into_connection();
        let repo = TransactionRepository::new(db);

        let summary = repo.summary(&[deposit.id, withdrawal.id]).await.unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_deposits, dec!(40.00));
        assert_eq!(summary.total_withdrawals, dec!(15.50));
        assert_eq!(summary.net, dec!(24.50));
    }

    #[tokio::test]
    async fn test_set_type_skips_matching_rows() {
        let user_id = Uuid::new_v4();
        let account_id = Uuid::new_v4();
        let deposit = stored(user_id, account_id, TransactionType::Deposit);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![deposit.clone()]])
            .into_connection();
        let repo = TransactionRepository::new(db);

        let count = repo
            .set_type(&[deposit.id], TransactionType::Deposit)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
