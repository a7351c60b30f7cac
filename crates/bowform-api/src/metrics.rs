//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "bowform_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "bowform_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "bowform_http_requests_in_flight";

    // Analysis requests
    pub const ANALYSIS_REQUESTS_TOTAL: &str = "bowform_analysis_requests_total";
    pub const UPLOAD_BYTES_TOTAL: &str = "bowform_upload_bytes_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record an analysis request by source (`upload` or `sample`) and outcome.
pub fn record_analysis_request(source: &str, outcome: &str) {
    let labels = [
        ("source", source.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::ANALYSIS_REQUESTS_TOTAL, &labels).increment(1);
}

/// Record bytes received for an upload.
pub fn record_upload_bytes(bytes: u64) {
    counter!(names::UPLOAD_BYTES_TOTAL).increment(bytes);
}

/// Collapse identifiers and sample names so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    let mut out = Vec::new();
    let mut previous = "";
    for segment in path.split('/') {
        let replaced = if uuid::Uuid::parse_str(segment).is_ok() {
            ":identifier"
        } else if previous == "analyze-sample" && !segment.is_empty() {
            ":video_name"
        } else {
            segment
        };
        out.push(replaced);
        previous = segment;
    }
    out.join("/")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
