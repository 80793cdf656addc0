//! API routes module

pub mod carts;
pub mod files;
pub mod health;
pub mod orders;
pub mod products;
pub mod promotions;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .nest("/files", files::router(state))
        .nest("/carts", carts::router())
        .nest("/orders", orders::router())
        .nest("/promotions", promotions::router())
}

/// `/ready` with database and blob storage checks.
///
/// Merged next to the stateless app router so probes skip the API middleware.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
