//! Prometheus metrics for catalog and lead-capture activity.

use metrics::{counter, histogram};

/// Initialize metrics exporter (Prometheus).
pub fn init_metrics() {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record a product write (`create`, `update`, `delete`).
pub fn product_changed(op: &'static str) {
    counter!("catalog_products_total", "op" => op).increment(1);
}

/// Record a submitted lead (`contact` or `download`).
pub fn query_submitted(kind: &'static str) {
    counter!("catalog_queries_submitted_total", "kind" => kind).increment(1);
}

/// Record a stored upload and its size.
pub fn upload_stored(size: usize) {
    counter!("catalog_uploads_total").increment(1);
    histogram!("catalog_upload_bytes").record(size as f64);
}

/// Record a login attempt (`success` or `failure`).
pub fn login_attempt(outcome: &'static str) {
    counter!("catalog_logins_total", "outcome" => outcome).increment(1);
}
