//! Domain counters for products and files.

use metrics::counter;

pub struct ProductMetrics;

impl ProductMetrics {
    pub fn record_listed(returned: usize, total: u64) {
        counter!("product_operations_total", "operation" => "list").increment(1);
        tracing::debug!(returned, total, "Listed products");
    }

    pub fn record_created() {
        counter!("product_operations_total", "operation" => "create").increment(1);
    }

    pub fn record_updated() {
        counter!("product_operations_total", "operation" => "update").increment(1);
    }

    pub fn record_deleted(hard: bool) {
        let operation = if hard { "hard_delete" } else { "soft_delete" };
        counter!("product_operations_total", "operation" => operation).increment(1);
    }

    pub fn record_restored() {
        counter!("product_operations_total", "operation" => "restore").increment(1);
    }

    /// `outcome` is `not_modified` or `failed`.
    pub fn record_precondition(outcome: &'static str) {
        counter!("product_preconditions_total", "outcome" => outcome).increment(1);
    }

    pub fn record_conflict() {
        counter!("product_conflicts_total").increment(1);
    }
}

pub struct FileMetrics;

impl FileMetrics {
    pub fn record_uploaded(bytes: u64) {
        counter!("file_operations_total", "operation" => "upload").increment(1);
        counter!("file_bytes_uploaded_total").increment(bytes);
    }

    pub fn record_downloaded() {
        counter!("file_operations_total", "operation" => "download").increment(1);
    }
}
