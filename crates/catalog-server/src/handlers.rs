//! Product route handlers.
//!
//! Every handler hands its store work to `spawn_blocking`, so a request
//! blocks on `SQLite` for its full duration without stalling the runtime.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog_store::{Product, ProductInput};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, instrument, warn};

use crate::errors::ApiError;
use crate::metrics;
use crate::server::AppState;

/// Largest request body accepted for create and update.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    /// Confirmation text.
    pub message: String,
}

/// Parse a path id. Anything that is not a signed 64-bit integer becomes `0`,
/// which never matches a row.
pub fn parse_id(raw: &str) -> i64 {
    raw.parse().unwrap_or(0)
}

/// Read and decode a product body, ignoring `Content-Type`.
async fn read_input(body: Body) -> Result<ProductInput, ApiError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            warn!(error = %e, "failed to read request body");
            ApiError::BadRequest
        })?;
    decode_input(&bytes)
}

/// Decode the first JSON value in `bytes` as a product.
///
/// Bytes after the first value are ignored, a repeated key keeps its last
/// value, and `null` yields an input with every field absent. An empty body
/// or a non-object value is rejected.
pub fn decode_input(bytes: &[u8]) -> Result<ProductInput, ApiError> {
    let first = serde_json::Deserializer::from_slice(bytes)
        .into_iter::<Value>()
        .next();
    let value = match first {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            warn!(error = %e, "invalid product body");
            return Err(ApiError::BadRequest);
        }
        None => {
            warn!("empty product body");
            return Err(ApiError::BadRequest);
        }
    };

    match value {
        Value::Null => Ok(ProductInput::default()),
        object @ Value::Object(_) => serde_json::from_value(object).map_err(|e| {
            warn!(error = %e, "invalid product body");
            ApiError::BadRequest
        }),
        other => {
            warn!(kind = json_kind(&other), "product body is not an object");
            Err(ApiError::BadRequest)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Run a store call on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> catalog_store::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!(error = %e, "blocking store task failed");
            Err(ApiError::Internal)
        }
    }
}

/// GET /products
#[instrument(skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let store = state.store.clone();
    let products = blocking(move || store.list()).await?;
    Ok(Json(products))
}

/// GET /products/{id}
#[instrument(skip_all, fields(id = %raw_id))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id);
    let store = state.store.clone();
    blocking(move || store.get(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// POST /products
#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Body,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let input = read_input(body).await?;
    let store = state.store.clone();
    let product = blocking(move || store.create(&input)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id}
///
/// Consults the failure gate before the id or body is looked at.
#[instrument(skip_all, fields(id = %raw_id))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Body,
) -> Result<Json<Product>, ApiError> {
    if state.failure_gate.should_fail() {
        metrics::record_injected_failure();
        warn!("injected update failure");
        return Err(ApiError::Internal);
    }

    let id = parse_id(&raw_id);
    let input = read_input(body).await?;
    let store = state.store.clone();
    blocking(move || store.update(id, &input))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// DELETE /products/{id}
#[instrument(skip_all, fields(id = %raw_id))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&raw_id);
    let store = state.store.clone();
    if blocking(move || store.delete(id)).await? {
        Ok(Json(MessageBody {
            message: "Product deleted".into(),
        }))
    } else {
        Err(ApiError::NotFound)
    }
}
