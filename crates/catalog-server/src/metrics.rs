//! Prometheus metrics recorder, request counting middleware, and the
//! `/metrics` renderer.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// HTTP requests total (counter, labels: method, route, status).
pub const HTTP_REQUESTS_TOTAL: &str = "catalog_http_requests_total";
/// Updates rejected by the failure gate (counter).
pub const INJECTED_FAILURES_TOTAL: &str = "catalog_injected_failures_total";

/// Install the Prometheus recorder as the global `metrics` recorder.
///
/// Call once at startup. Fails if another recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle, String> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| e.to_string())?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally.
///
/// Renders an empty exposition; used by tests and embedders that do not
/// want a global recorder.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

/// Middleware counting every routed request by method, route template, and
/// response status.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_owned(), |p| p.as_str().to_owned());
    let method = req.method().as_str().to_owned();

    let resp = next.run(req).await;

    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method,
        "route" => route,
        "status" => resp.status().as_u16().to_string()
    )
    .increment(1);

    resp
}

/// Count one injected failure.
pub fn record_injected_failure() {
    metrics::counter!(INJECTED_FAILURES_TOTAL).increment(1);
}
