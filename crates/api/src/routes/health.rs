//! Health check for FinTrack.
//!
//! Reports the UTC date the server uses as "today" when classifying budgets,
//! so a client can tell when an ENDED status is expected.

use axum::{Json, Router, routing::get};
use chrono::NaiveDate;
use serde::Serialize;

use crate::{AppState, today};

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "fintrack";

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `healthy` when the process answers.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Server date used for budget status.
    pub today: NaiveDate,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        today: today(),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
