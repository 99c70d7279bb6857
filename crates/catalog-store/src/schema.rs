//! `products` table DDL and the seed row.

use rusqlite::Connection;
use tracing::info;

use crate::errors::Result;
use crate::product::ProductInput;
use crate::repo::ProductRepo;

/// DDL for the single `products` table. `AUTOINCREMENT` keeps ids strictly
/// increasing and never reused, even after the highest row is deleted.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    manufacture TEXT,
    output REAL,
    price INTEGER,
    width REAL,
    height REAL
);
";

/// The record inserted into an empty table on first start.
pub fn seed_product() -> ProductInput {
    ProductInput {
        name: Some("Air Source Heat Pump".into()),
        manufacture: Some("Generic Manufacturer".into()),
        output: Some(12.5),
        price: Some(45_000),
        width: Some(80.0),
        height: Some(120.0),
    }
}

/// Create the schema if absent.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

/// Insert [`seed_product`] when the table is empty. Returns whether a row
/// was inserted.
pub fn seed_if_empty(conn: &Connection) -> Result<bool> {
    if ProductRepo::count(conn)? > 0 {
        return Ok(false);
    }
    let id = ProductRepo::insert(conn, &seed_product())?;
    info!(product_id = id, "database seeded with initial data");
    Ok(true)
}
