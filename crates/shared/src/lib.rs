//! Shared types, errors, and configuration for FinTrack.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT issuance and validation
//! - Authentication request/response types
//! - Pagination and money formatting helpers

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, TokenPair, TokenType};
pub use config::{AdminSiteConfig, AppConfig};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};
