//! The `Product` record and its wire shapes.

use serde::{Deserialize, Serialize};

/// A catalog item. Every field except `id` is nullable; `None` serializes
/// as JSON `null` and is distinct from zero or an empty string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Auto-assigned primary key.
    pub id: i64,
    /// Display name.
    pub name: Option<String>,
    /// Manufacturer name.
    pub manufacture: Option<String>,
    /// Capacity rating.
    pub output: Option<f64>,
    /// Price in minor currency units.
    pub price: Option<i64>,
    /// Physical width.
    pub width: Option<f64>,
    /// Physical height.
    pub height: Option<f64>,
}

/// Request body for create and update: a [`Product`] without `id`.
///
/// Missing keys decode as `None`; unknown keys (including a stray `id`)
/// are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Display name.
    pub name: Option<String>,
    /// Manufacturer name.
    pub manufacture: Option<String>,
    /// Capacity rating.
    pub output: Option<f64>,
    /// Price in minor currency units.
    pub price: Option<i64>,
    /// Physical width.
    pub width: Option<f64>,
    /// Physical height.
    pub height: Option<f64>,
}

impl Product {
    /// Combine an id with the fields of an input record.
    pub fn from_input(id: i64, input: ProductInput) -> Self {
        Self {
            id,
            name: input.name,
            manufacture: input.manufacture,
            output: input.output,
            price: input.price,
            width: input.width,
            height: input.height,
        }
    }
}

/// Column list in the order [`map_row_to_product`] expects.
pub const PRODUCT_COLUMNS: &str = "id, name, manufacture, output, price, width, height";

/// Map a row selected with [`PRODUCT_COLUMNS`] to a [`Product`].
pub fn map_row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        manufacture: row.get(2)?,
        output: row.get(3)?,
        price: row.get(4)?,
        width: row.get(5)?,
        height: row.get(6)?,
    })
}
