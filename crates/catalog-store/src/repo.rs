//! Product repository: CRUD over the `products` table.
//!
//! Stateless: every method takes `&Connection` so callers decide which
//! pooled connection a sequence of statements runs on.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::product::{PRODUCT_COLUMNS, Product, ProductInput, map_row_to_product};

/// Product repository.
pub struct ProductRepo;

impl ProductRepo {
    /// All products ordered by id ascending.
    pub fn list(conn: &Connection) -> Result<Vec<Product>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))?;
        let rows = stmt
            .query_map([], map_row_to_product)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Look up one product.
    pub fn get(conn: &Connection, id: i64) -> Result<Option<Product>> {
        let row = conn
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                params![id],
                map_row_to_product,
            )
            .optional()?;
        Ok(row)
    }

    /// Insert a product and return its new id.
    pub fn insert(conn: &Connection, input: &ProductInput) -> Result<i64> {
        let _ = conn.execute(
            "INSERT INTO products (name, manufacture, output, price, width, height)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                input.name,
                input.manufacture,
                input.output,
                input.price,
                input.width,
                input.height
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Replace every non-id column of a product. Returns rows changed.
    pub fn update(conn: &Connection, id: i64, input: &ProductInput) -> Result<usize> {
        let changed = conn.execute(
            "UPDATE products
             SET name = ?1, manufacture = ?2, output = ?3, price = ?4, width = ?5, height = ?6
             WHERE id = ?7",
            params![
                input.name,
                input.manufacture,
                input.output,
                input.price,
                input.width,
                input.height,
                id
            ],
        )?;
        Ok(changed)
    }

    /// Delete a product. Returns rows changed.
    pub fn delete(conn: &Connection, id: i64) -> Result<usize> {
        let changed = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        Ok(changed)
    }

    /// Number of rows in the table.
    pub fn count(conn: &Connection) -> Result<i64> {
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(n)
    }
}
