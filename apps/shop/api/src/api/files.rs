//! Files API routes

use axum::Router;
use domain_files::handlers;

use crate::state::AppState;

/// Create files router over the shared blob store
pub fn router(state: &AppState) -> Router {
    handlers::router(
        state.blobs.clone(),
        state.config.blob_storage.max_upload_bytes,
    )
}
