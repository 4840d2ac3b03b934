//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use fintrack_core::{
    auth::{PasswordError, RegistrationError},
    budget::BudgetError as BudgetRuleError,
    filters::FilterParseError,
    transaction::TransactionError as TransactionRuleError,
    validation::ValidationError,
};
use fintrack_db::repositories::{AccountError, BudgetError, CategoryError, TransactionError};
use fintrack_shared::{AppError, JwtError};

/// An [`AppError`] rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_internal() {
            error!(error = %self.0, "Request failed");
        }

        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.public_message()
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

macro_rules! via_app_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self(err.into())
                }
            }
        )*
    };
}

via_app_error!(AccountError, BudgetError, CategoryError, TransactionError);

macro_rules! validation_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self(AppError::Validation(err.to_string()))
                }
            }
        )*
    };
}

validation_error!(
    BudgetRuleError,
    TransactionRuleError,
    RegistrationError,
    ValidationError,
    FilterParseError,
);

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
