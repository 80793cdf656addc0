//! Application state management

use database::postgres::DatabaseConnection;
use domain_files::LocalBlobStore;
use std::sync::Arc;

/// Shared application state
///
/// Cloned into the readiness router; the connection pool and blob store are
/// shared, not copied.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    pub blobs: Arc<LocalBlobStore>,
}
