//! # Axum Helpers
//!
//! Shared building blocks for the shop HTTP services.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//! - **[`http`]**: CORS, security headers, entity tags, paging headers
//! - **[`errors`]**: `AppError` and the JSON error body with stable error codes
//! - **[`extractors`]**: typed id paths, validated JSON/query, `If-Match`/`If-None-Match`
//! - **[`audit`]**: audit log events

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{EntityTag, EntityTagList, X_PAGE, X_PAGE_SIZE, X_TOTAL_COUNT, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, IfMatch, IfNoneMatch, ValidatedJson, ValidatedQuery};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
