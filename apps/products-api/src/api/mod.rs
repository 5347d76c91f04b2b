//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by `create_router`.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/products", products::router(state))
}

/// `/ready` with a real database check. Merge it after `create_router`.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
