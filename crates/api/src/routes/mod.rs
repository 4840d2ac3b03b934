//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::auth::{auth_middleware, require_staff},
};

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod health;
pub mod root;
pub mod summary;
pub mod transactions;

/// Creates the API router: public, authenticated, and staff-only routes.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(summary::routes())
        .merge(accounts::routes())
        .merge(budgets::routes())
        .merge(categories::routes())
        .merge(transactions::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Layers run bottom-up: the token is checked before the staff flag.
    let admin_routes = admin::routes()
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(root::routes())
        .merge(auth::routes())
        .merge(protected_routes)
        .nest("/admin", admin_routes)
}

#[cfg(test)]
mod tests;
