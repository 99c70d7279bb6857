//! Store initialization and the pool-backed [`ProductStore`] handle.

use std::path::Path;

use tracing::{info, instrument};

use crate::connection::{self, ConnectionConfig, ConnectionPool, PooledConnection};
use crate::errors::{Result, StoreError};
use crate::product::{Product, ProductInput};
use crate::repo::ProductRepo;
use crate::schema;

/// Open (or create) the database at `path`, ensure the schema, and seed an
/// empty table.
///
/// The parent directory is created recursively when missing. Any failure
/// here is meant to abort process startup.
pub fn initialize(path: &Path, config: &ConnectionConfig) -> Result<ProductStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let pool = connection::new_file(path, config)?;
    let store = ProductStore::prepare(pool)?;
    info!(path = %path.display(), "database initialized");
    Ok(store)
}

/// Cloneable handle over the connection pool, shared by every request.
///
/// Each method checks out one connection and runs at most two statements
/// on it (a write and its read-back). There are no transactions: a write
/// stays committed even if the read-back fails.
#[derive(Clone, Debug)]
pub struct ProductStore {
    pool: ConnectionPool,
}

impl ProductStore {
    /// Initialized, seeded in-memory store (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::prepare(connection::new_in_memory()?)
    }

    fn prepare(pool: ConnectionPool) -> Result<Self> {
        {
            let conn = pool.get()?;
            schema::ensure_schema(&conn)?;
            let _ = schema::seed_if_empty(&conn)?;
        }
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// All products ordered by id.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Product>> {
        let conn = self.conn()?;
        ProductRepo::list(&conn)
    }

    /// One product, or `None` if no row has this id.
    #[instrument(skip(self))]
    pub fn get(&self, id: i64) -> Result<Option<Product>> {
        let conn = self.conn()?;
        ProductRepo::get(&conn, id)
    }

    /// Insert and return the stored record.
    #[instrument(skip(self, input))]
    pub fn create(&self, input: &ProductInput) -> Result<Product> {
        let conn = self.conn()?;
        let id = ProductRepo::insert(&conn, input)?;
        ProductRepo::get(&conn, id)?
            .ok_or_else(|| StoreError::Internal(format!("product {id} missing after insert")))
    }

    /// Replace a product's fields. `None` if no row has this id.
    #[instrument(skip(self, input))]
    pub fn update(&self, id: i64, input: &ProductInput) -> Result<Option<Product>> {
        let conn = self.conn()?;
        if ProductRepo::update(&conn, id, input)? == 0 {
            return Ok(None);
        }
        ProductRepo::get(&conn, id)?
            .map(Some)
            .ok_or_else(|| StoreError::Internal(format!("product {id} missing after update")))
    }

    /// Delete a product. `false` if no row has this id.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        Ok(ProductRepo::delete(&conn, id)? > 0)
    }

    /// Number of stored products.
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn()?;
        ProductRepo::count(&conn)
    }
}
