//! HTTP server: router assembly and listener lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use catalog_store::ProductStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::failure::FailureGate;
use crate::handlers;
use crate::health::{self, HealthResponse};
use crate::metrics;

/// How long [`ServerHandle::shutdown`] waits for in-flight requests.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide store handle.
    pub store: ProductStore,
    /// Consulted by `PUT /products/{id}` before any other work.
    pub failure_gate: Arc<dyn FailureGate>,
    /// Renders `/metrics`.
    pub metrics: PrometheusHandle,
    /// When the state was created.
    pub start_time: Instant,
}

impl AppState {
    /// Build state with the start time set to now.
    pub fn new(
        store: ProductStore,
        failure_gate: Arc<dyn FailureGate>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            store,
            failure_gate,
            metrics,
            start_time: Instant::now(),
        }
    }
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{id}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(axum::middleware::from_fn(metrics::track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The product catalog HTTP server.
pub struct CatalogServer {
    config: ServerConfig,
    state: AppState,
}

impl CatalogServer {
    /// Create a server around an initialized store.
    pub fn new(
        config: ServerConfig,
        store: ProductStore,
        failure_gate: Arc<dyn FailureGate>,
        metrics: PrometheusHandle,
    ) -> Self {
        Self {
            config,
            state: AppState::new(store, failure_gate, metrics),
        }
    }

    /// Router bound to this server's state.
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve in a background task until
    /// [`ServerHandle::shutdown`] is called.
    pub async fn listen(&self) -> std::io::Result<ServerHandle> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { stop.cancelled().await })
                .await;
            if let Err(e) = result {
                error!(error = %e, "server terminated with error");
            }
        });

        info!(%addr, "server running on http://localhost:{}", addr.port());
        Ok(ServerHandle { addr, task, cancel })
    }

    /// Server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// A running listener, returned by [`CatalogServer::listen`].
pub struct ServerHandle {
    addr: SocketAddr,
    task: JoinHandle<()>,
    cancel: CancellationToken,
}

impl ServerHandle {
    /// Bound address (resolves port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bound port.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Stop accepting connections and wait up to [`DRAIN_TIMEOUT`] for
    /// in-flight requests. Returns `false` if the drain did not finish.
    pub async fn shutdown(self) -> bool {
        self.shutdown_within(DRAIN_TIMEOUT).await
    }

    /// [`ServerHandle::shutdown`] with an explicit drain timeout. The serving
    /// task is aborted if it outlives `timeout`.
    pub async fn shutdown_within(self, timeout: Duration) -> bool {
        let Self {
            addr,
            mut task,
            cancel,
        } = self;
        cancel.cancel();
        info!(%addr, timeout_secs = timeout.as_secs(), "draining in-flight requests");

        match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(())) => {
                info!(%addr, "server stopped");
                true
            }
            Ok(Err(e)) => {
                error!(error = %e, "server task failed");
                false
            }
            Err(_) => {
                task.abort();
                warn!(%addr, "shutdown timed out after {timeout:?}");
                false
            }
        }
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(state.start_time))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
