//! # catalog-store
//!
//! `SQLite` persistence for the product catalog.
//!
//! - [`connection`]: `r2d2` pool with WAL pragmas applied per connection
//! - [`schema`]: `products` table DDL and the one-shot seed row
//! - [`product`]: the [`Product`] record, its input shape, and row mapping
//! - [`repo`]: stateless SQL over a `&Connection`
//! - [`store`]: [`initialize`] and the pool-backed [`ProductStore`] handle
//!
//! The store knows nothing about HTTP.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod product;
pub mod repo;
pub mod schema;
pub mod store;

pub use connection::{ConnectionConfig, ConnectionPool};
pub use errors::{Result, StoreError};
pub use product::{Product, ProductInput, map_row_to_product};
pub use repo::ProductRepo;
pub use store::{ProductStore, initialize};
