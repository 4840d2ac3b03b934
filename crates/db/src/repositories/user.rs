//! User repository for database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

use fintrack_shared::types::PageRequest;

use crate::entities::{accounts, transactions, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Admin surface access.
    pub is_staff: bool,
}

/// Per-user figures shown in the admin user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    /// Number of accounts.
    pub account_count: u64,
    /// Number of transactions.
    pub transaction_count: u64,
    /// Sum of account balances.
    pub total_balance: Decimal,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new active user.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            is_active: Set(true),
            is_staff: Set(input.is_staff),
            date_joined: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Finds a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// Checks if a username is taken.
    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if an email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Activates or deactivates users; returns the number of rows changed.
    pub async fn set_active(&self, ids: &[Uuid], active: bool) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = users::Entity::update_many()
            .col_expr(users::Column::IsActive, Expr::value(active))
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Lists users, newest first, with the total count.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<users::Model>, u64), DbErr> {
        let page = page.normalized();
        let query = users::Entity::find().order_by_desc(users::Column::DateJoined);

        let total = query.clone().count(&self.db).await?;
        let users = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((users, total))
    }

    /// Loads users by ID.
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
    }

    /// Number of transactions owned by a user.
    pub async fn count_transactions(&self, user_id: Uuid) -> Result<u64, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
    }

    /// Account and transaction figures for one user.
    pub async fn stats(&self, user_id: Uuid) -> Result<UserStats, DbErr> {
        let balances = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        Ok(UserStats {
            account_count: balances.len() as u64,
            transaction_count: self.count_transactions(user_id).await?,
            total_balance: balances.iter().map(|a| a.balance).sum(),
        })
    }
}
