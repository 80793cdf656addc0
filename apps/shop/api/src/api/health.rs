//! Readiness probe with real dependency checks.

use axum::{extract::State, response::Response};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

/// Readiness check: database ping and blob storage root.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
        (
            "blob_storage",
            Box::pin(async {
                state
                    .blobs
                    .check_health()
                    .await
                    .map_err(|e| e.to_string())
            }),
        ),
    ];

    run_health_checks(checks).await
}
