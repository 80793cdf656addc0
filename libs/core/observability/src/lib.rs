//! Prometheus metrics for the shop services.
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, metrics_middleware, ProductMetrics};
//!
//! init_metrics()?;
//! ProductMetrics::record_created();
//!
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler))
//!     .layer(axum::middleware::from_fn(metrics_middleware));
//! ```

pub mod middleware;
pub mod shop;

pub use middleware::metrics_middleware;
pub use metrics::{counter, gauge, histogram};
pub use shop::{FileMetrics, ProductMetrics};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `/metrics`
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP requests answered with 4xx or 5xx"
    );

    describe_counter!(
        "product_operations_total",
        "Product operations by kind"
    );
    describe_counter!(
        "product_preconditions_total",
        "Conditional request outcomes on products"
    );
    describe_counter!(
        "product_conflicts_total",
        "Updates rejected because another writer committed first"
    );

    describe_counter!("file_operations_total", "Blob storage operations by kind");
    describe_counter!("file_bytes_uploaded_total", "Bytes written to blob storage");
}
