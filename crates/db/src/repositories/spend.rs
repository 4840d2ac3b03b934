//! Budget `spent_amount` bookkeeping.
//!
//! A withdrawal counts against the budget its category is linked to at the
//! time. Anything that changes which withdrawals a budget sees (transaction
//! writes, relinking or unlinking a category, cascaded deletes) moves the
//! amount through these helpers, inside the caller's database transaction.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter,
    QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entities::{budgets, categories, sea_orm_active_enums::TransactionType, transactions};

/// Adds `delta` to a budget's `spent_amount` under a row lock.
pub(crate) async fn adjust_spent<C: ConnectionTrait>(
    conn: &C,
    budget_id: Uuid,
    delta: Decimal,
) -> Result<(), DbErr> {
    if delta.is_zero() {
        return Ok(());
    }

    let Some(budget) = budgets::Entity::find_by_id(budget_id)
        .lock_exclusive()
        .one(conn)
        .await?
    else {
        return Ok(());
    };

    // spent_amount has a CHECK (>= 0); a manual reset can leave less to revert.
    let spent = (budget.spent_amount + delta).max(Decimal::ZERO);
    let mut active: budgets::ActiveModel = budget.into();
    active.spent_amount = Set(spent);
    active.update(conn).await?;

    Ok(())
}

/// Sum of withdrawals recorded in a category.
pub(crate) async fn category_withdrawals<C: ConnectionTrait>(
    conn: &C,
    category_id: Uuid,
) -> Result<Decimal, DbErr> {
    let amounts: Vec<Decimal> = transactions::Entity::find()
        .select_only()
        .column(transactions::Column::Amount)
        .filter(transactions::Column::CategoryId.eq(category_id))
        .filter(transactions::Column::TransactionType.eq(TransactionType::Withdrawal))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(amounts.into_iter().sum())
}

/// Moves a category's withdrawals from the budget it was linked to onto the
/// one it is linked to now.
pub(crate) async fn move_category_spend<C: ConnectionTrait>(
    conn: &C,
    category_id: Uuid,
    from: Option<Uuid>,
    to: Option<Uuid>,
) -> Result<(), DbErr> {
    if from == to {
        return Ok(());
    }

    let total = category_withdrawals(conn, category_id).await?;
    if let Some(from) = from {
        adjust_spent(conn, from, -total).await?;
    }
    if let Some(to) = to {
        adjust_spent(conn, to, total).await?;
    }
    Ok(())
}

/// Withdrawals on an account, summed per linked budget.
pub(crate) async fn account_spend_by_budget<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
) -> Result<BTreeMap<Uuid, Decimal>, DbErr> {
    let rows: Vec<(Decimal, Uuid)> = transactions::Entity::find()
        .select_only()
        .column(transactions::Column::Amount)
        .column(categories::Column::BudgetId)
        .join(JoinType::InnerJoin, transactions::Relation::Categories.def())
        .filter(transactions::Column::AccountId.eq(account_id))
        .filter(transactions::Column::TransactionType.eq(TransactionType::Withdrawal))
        .filter(categories::Column::BudgetId.is_not_null())
        .into_tuple()
        .all(conn)
        .await?;

    let mut totals = BTreeMap::new();
    for (amount, budget_id) in rows {
        *totals.entry(budget_id).or_insert(Decimal::ZERO) += amount;
    }
    Ok(totals)
}


#[cfg(test)]
mod tests {
    use super::testing::{amount_row, bound, statement_log};
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn budget(spent: Decimal) -> budgets::Model {
        let now = Utc::now().into();
        let day = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        budgets::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            name: "Groceries".to_string(),
            total_amount: dec!(500.00),
            spent_amount: spent,
            start_date: day,
            end_date: day,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_adjust_spent_locks_and_writes() {
        let current = budget(dec!(100.00));
        let mut updated = current.clone();
        updated.spent_amount = dec!(140.00);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current.clone()], vec![updated]])
            .into_connection();

        adjust_spent(&db, current.id, dec!(40.00)).await.unwrap();

        let log = statement_log(db);
        assert!(log.contains("FOR UPDATE"));
        assert!(log.contains("spent_amount"));
        assert!(log.contains(&bound(dec!(140.00))));
    }

    #[tokio::test]
    async fn test_adjust_spent_clamps_at_zero() {
        let current = budget(dec!(10.00));
        let mut updated = current.clone();
        updated.spent_amount = Decimal::ZERO;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![current.clone()], vec![updated]])
            .into_connection();

        adjust_spent(&db, current.id, dec!(-40.00)).await.unwrap();

        let log = statement_log(db);
        assert!(log.contains(&bound(Decimal::ZERO)));
        assert!(!log.contains(&bound(dec!(-30.00))));
    }

    #[tokio::test]
    async fn test_zero_delta_touches_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        adjust_spent(&db, Uuid::new_v4(), Decimal::ZERO).await.unwrap();

        assert_eq!(statement_log(db), "[]");
    }

    #[tokio::test]
    async fn test_move_category_spend_between_budgets() {
        let old = budget(dec!(100.00));
        let new = budget(dec!(5.00));
        let mut old_after = old.clone();
        old_after.spent_amount = dec!(57.50);
        let mut new_after = new.clone();
        new_after.spent_amount = dec!(47.50);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![amount_row(dec!(40.00)), amount_row(dec!(2.50))]])
            .append_query_results([
                vec![old.clone()],
                vec![old_after],
                vec![new.clone()],
                vec![new_after],
            ])
            .into_connection();

        move_category_spend(&db, Uuid::new_v4(), Some(old.id), Some(new.id))
            .await
            .unwrap();

        let log = statement_log(db);
        assert!(log.contains(&bound(dec!(57.50))));
        assert!(log.contains(&bound(dec!(47.50))));
    }

    #[tokio::test]
    async fn test_same_link_moves_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let budget_id = Some(Uuid::new_v4());

        move_category_spend(&db, Uuid::new_v4(), budget_id, budget_id)
            .await
            .unwrap();

        assert_eq!(statement_log(db), "[]");
    }

    #[tokio::test]
    async fn test_account_spend_grouped_by_budget() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let row = |budget_id: Uuid, amount: Decimal| {
            BTreeMap::from([
                ("amount", Value::from(amount)),
                ("budget_id", Value::from(budget_id)),
            ])
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                row(a, dec!(10.00)),
                row(b, dec!(3.25)),
                row(a, dec!(4.50)),
            ]])
            .into_connection();

        let totals = account_spend_by_budget(&db, Uuid::new_v4()).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&a], dec!(14.50));
        assert_eq!(totals[&b], dec!(3.25));
    }
}
