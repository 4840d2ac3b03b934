//! Demo data seeder for FinTrack.
//!
//! Creates a staff user and a regular user with accounts, a budget for the
//! current month, categories, and a few transactions. Running it twice is a
//! no-op.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use fintrack_core::auth::hash_password;
use fintrack_db::{
    AccountRepository, BudgetRepository, CategoryRepository, TransactionRepository,
    UserRepository,
    entities::sea_orm_active_enums::TransactionType,
    repositories::{
        account::AccountInput, budget::BudgetInput, category::CategoryInput,
        transaction::TransactionInput, user::CreateUserInput,
    },
};
use sea_orm::DatabaseConnection;

const STAFF_USERNAME: &str = "admin";
const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seeder=info,fintrack_db=info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("FINTRACK__DATABASE__URL"))
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

    let db = fintrack_db::connect(&database_url).await?;
    info!("Connected to database");

    let users = UserRepository::new(db.clone());
    if users.username_exists(DEMO_USERNAME).await? {
        info!("Demo data already present, skipping");
        return Ok(());
    }

    seed_user(&users, STAFF_USERNAME, "Site", "Admin", true).await?;
    let demo_id = seed_user(&users, DEMO_USERNAME, "Demo", "User", false).await?;
    seed_finances(&db, demo_id).await?;

    info!(username = DEMO_USERNAME, "Seeding complete");
    Ok(())
}

async fn seed_user(
    users: &UserRepository,
    username: &str,
    first_name: &str,
    last_name: &str,
    is_staff: bool,
) -> anyhow::Result<Uuid> {
    let user = users
        .create(CreateUserInput {
            username: username.to_string(),
            email: format!("{username}@fintrack.local"),
            password_hash: hash_password(DEMO_PASSWORD)?,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_staff,
        })
        .await?;

    info!(user_id = %user.id, username, is_staff, "Created user");
    Ok(user.id)
}

fn current_month(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    let end = start
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .unwrap_or(start);
    (start, end)
}

async fn seed_finances(db: &DatabaseConnection, user_id: Uuid) -> anyhow::Result<()> {
    let accounts = AccountRepository::new(db.clone());
    let checking = accounts
        .create(
            user_id,
            AccountInput {
                name: "Checking".to_string(),
                balance: Decimal::new(250_000, 2),
            },
        )
        .await?;
    accounts
        .create(
            user_id,
            AccountInput {
                name: "Savings".to_string(),
                balance: Decimal::new(1_000_000, 2),
            },
        )
        .await?;

    let (start_date, end_date) = current_month(Utc::now().date_naive());
    let groceries_budget = BudgetRepository::new(db.clone())
        .create(
            user_id,
            BudgetInput {
                account_id: checking.id,
                name: "Monthly Groceries".to_string(),
                total_amount: Decimal::new(60_000, 2),
                spent_amount: Decimal::ZERO,
                start_date,
                end_date,
            },
        )
        .await?;

    let categories = CategoryRepository::new(db.clone());
    let groceries = categories
        .create(
            user_id,
            CategoryInput {
                name: "Groceries".to_string(),
                description: Some("Supermarket and market runs".to_string()),
                budget_id: Some(groceries_budget.id),
            },
        )
        .await?;
    let salary = categories
        .create(
            user_id,
            CategoryInput {
                name: "Salary".to_string(),
                description: None,
                budget_id: None,
            },
        )
        .await?;

    let transactions = TransactionRepository::new(db.clone());
    let entries = [
        (salary.id, TransactionType::Deposit, Decimal::new(300_000, 2), "Monthly salary"),
        (groceries.id, TransactionType::Withdrawal, Decimal::new(8_540, 2), "Weekly shop"),
        (groceries.id, TransactionType::Withdrawal, Decimal::new(13_210, 2), "Bulk stock-up"),
    ];
    for (category_id, transaction_type, amount, description) in entries {
        transactions
            .create(
                user_id,
                TransactionInput {
                    account_id: checking.id,
                    category_id: Some(category_id),
                    transaction_type,
                    amount,
                    description: description.to_string(),
                },
            )
            .await?;
    }

    info!(%user_id, "Seeded accounts, budget, categories and transactions");
    Ok(())
}
