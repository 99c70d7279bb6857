//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`CatalogSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over defaults
//! 3. Apply `CATALOG_*` environment overrides (highest priority)
//! 4. Validate ranges
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::CatalogSettings;

/// Env var naming an explicit settings file.
pub const SETTINGS_PATH_ENV: &str = "CATALOG_SETTINGS";

/// Settings file used when [`SETTINGS_PATH_ENV`] is unset.
pub const DEFAULT_SETTINGS_PATH: &str = "./data/settings.json";

/// Resolve the settings file path.
pub fn settings_path() -> PathBuf {
    read_env_string(SETTINGS_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH), PathBuf::from)
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults (plus env overrides). If the
/// file contains invalid JSON or the result fails validation, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<CatalogSettings> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// [`load_settings_from_path`] with overrides read through `lookup`.
pub fn load_settings_with<F>(path: &Path, lookup: F) -> Result<CatalogSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = serde_json::to_value(CatalogSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: CatalogSettings = serde_json::from_value(merged)?;
    apply_overrides(&mut settings, lookup);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply overrides from an arbitrary variable source.
///
/// Empty values are treated as unset. Values that fail to parse or fall
/// outside their range are ignored with a warning.
pub fn apply_overrides<F>(settings: &mut CatalogSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = get("CATALOG_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = get("CATALOG_PORT")
        .and_then(|v| checked("CATALOG_PORT", &v, |s| parse_u16_range(s, 1, 65535)))
    {
        settings.server.port = v;
    }
    if let Some(v) = get("CATALOG_DB_PATH") {
        settings.database.path = v;
    }
    if let Some(v) = get("CATALOG_POOL_SIZE")
        .and_then(|v| checked("CATALOG_POOL_SIZE", &v, |s| parse_u32_range(s, 1, 64)))
    {
        settings.database.pool_size = v;
    }
    if let Some(v) = get("CATALOG_UPDATE_FAILURE_RATE")
        .and_then(|v| checked("CATALOG_UPDATE_FAILURE_RATE", &v, parse_rate))
    {
        settings.chaos.update_failure_rate = v;
    }
    if let Some(v) = get("CATALOG_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = get("CATALOG_LOG_JSON").and_then(|v| checked("CATALOG_LOG_JSON", &v, parse_bool))
    {
        settings.logging.json = v;
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a probability in `0.0..=1.0`.
pub fn parse_rate(val: &str) -> Option<f64> {
    let n: f64 = val.parse().ok()?;
    (0.0..=1.0).contains(&n).then_some(n)
}

fn checked<T>(name: &str, val: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let result = parse(val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid env var, ignoring");
    }
    result
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
