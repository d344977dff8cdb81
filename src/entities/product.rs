//! Product entities - The product being edited and its category.
//!
//! These records are carried through from the product-edit snapshot; the core
//! reads them but never changes them.

use serde::{Deserialize, Serialize};

/// A sellable product built from ingredient usages
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier for the product
    pub id: i64,
    /// Name of the product
    pub name: String,
    /// Selling price
    pub price: f64,
    /// Markup multiplier applied to cost
    pub multiplicator: f64,
    /// Category of the product
    pub category_id: i64,
}

/// A product with the cost computed server-side
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductWithCost {
    /// The product
    pub product: Product,
    /// Server-computed cost at render time
    pub cost: f64,
}

/// Product category
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier for the category
    pub id: i64,
    /// Category name
    pub name: String,
    /// VAT rate in percent
    pub vat: i64,
}
