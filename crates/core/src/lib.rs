//! Core business logic for FinTrack.
//!
//! Pure functions and types with no web or database dependencies.
//!
//! # Modules
//!
//! - `budget` - Budget progress evaluation, period arithmetic, validation
//! - `transaction` - Deposit/withdrawal types and aggregates
//! - `filters` - Admin list filters (amount, date, budget status)
//! - `summary` - Per-user balance overview
//! - `auth` - Password hashing and registration rules
//! - `validation` - Account and category field rules

pub mod auth;
pub mod budget;
pub mod filters;
pub mod summary;
pub mod transaction;
pub mod validation;
