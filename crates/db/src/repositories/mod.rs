//! Repository abstractions for data access.
//!
//! Repositories hold a `DatabaseConnection` and are constructed per request.
//! Methods taking a `user_id` only see rows owned by that user; the
//! unscoped `list_all`/bulk methods back the admin surface.

pub mod account;
pub mod budget;
pub mod category;
mod spend;
pub mod transaction;
pub mod user;

pub use account::{AccountError, AccountRepository};
pub use budget::{BudgetError, BudgetRepository};
pub use category::{CategoryError, CategoryRepository};
pub use transaction::{TransactionError, TransactionRepository};
pub use user::UserRepository;
