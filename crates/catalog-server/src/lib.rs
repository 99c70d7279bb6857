//! # catalog-server
//!
//! Axum HTTP surface for the product catalog.
//!
//! - `GET|POST /products`, `GET|PUT|DELETE /products/{id}`
//! - `GET /health` and `GET /metrics` (Prometheus text)
//! - `{"error": ...}` envelope for every failure
//! - Pluggable failure gate consulted first by `PUT /products/{id}`
//! - Graceful shutdown of each listener through its `ServerHandle`

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod failure;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod server;

pub use config::ServerConfig;
pub use errors::ApiError;
pub use failure::{AlwaysFail, FailureGate, NeverFail, RandomFailureGate};
pub use server::{AppState, CatalogServer, DRAIN_TIMEOUT, ServerHandle};
