//! # catalog-settings
//!
//! Configuration for the product catalog service.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`CatalogSettings::default()`]
//! 2. **Settings file**: JSON, deep-merged over defaults
//! 3. **Environment variables**: `CATALOG_*` overrides (highest priority)
//!
//! The binary applies CLI flags on top of the result.
//!
//! # Usage
//!
//! ```no_run
//! use catalog_settings::{load_settings_from_path, settings_path};
//!
//! let settings = load_settings_from_path(&settings_path()).unwrap_or_default();
//! println!("listening on port {}", settings.server.port);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings_from_path, load_settings_with, settings_path};
pub use types::*;
