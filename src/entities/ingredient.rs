//! Ingredient entities - Ingredients, their price records and the enriched
//! row shown on the ingredients page.
//!
//! An ingredient is immutable reference data. Each price record describes one
//! purchase: `price` paid for `quantity` of the ingredient measured in
//! `unit_id`. Prices derived from another product carry that product's id in
//! `base_product_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Unit;

/// Ingredient reference data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier for the ingredient
    pub id: i64,
    /// Name of the ingredient (e.g., "Flour", "Milk")
    pub name: String,
}

/// One priced purchase record for an ingredient
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientPrice {
    /// Unique identifier for the price record
    pub id: i64,
    /// When the price was recorded, in unix seconds
    pub time_stamp: i64,
    /// Price paid
    pub price: f64,
    /// Quantity bought for that price
    pub quantity: f64,
    /// Unit the quantity is measured in
    pub unit_id: i64,
    /// Ingredient this price belongs to
    pub ingredient_id: i64,
    /// Source product for derived prices, None for directly-priced ingredients
    pub base_product_id: Option<i64>,
}

impl IngredientPrice {
    /// Whether this price was entered directly rather than derived from a product.
    #[must_use]
    pub const fn is_base(&self) -> bool {
        self.base_product_id.is_none()
    }

    /// The record timestamp as a UTC datetime, None if out of range.
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time_stamp, 0)
    }
}

/// An ingredient together with all of its price records.
///
/// The first price is the current one used for costing. No ordering is
/// imposed on the sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientWithPrices {
    /// The ingredient
    pub ingredient: Ingredient,
    /// Its price records, current price first
    #[serde(default)]
    pub prices: Vec<IngredientPrice>,
}

impl IngredientWithPrices {
    /// Id of the wrapped ingredient
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.ingredient.id
    }
}

/// An ingredient with exactly one price, as listed on the ingredients page
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientWithPrice {
    /// Ingredient id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// The price shown for this ingredient
    pub price: IngredientPrice,
}

/// Ingredients page row: an ingredient joined with its price unit plus
/// display fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientExtended {
    /// Ingredient id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// The price being displayed and edited
    pub price: IngredientPrice,
    /// True when the price was entered directly
    pub is_base: bool,
    /// Row is in edit mode
    pub editing: bool,
    /// Price for the displayed quantity, two decimals
    pub display_price: String,
    /// Quantity, two decimals
    pub display_quantity: String,
    /// Unit of the price, None if it did not resolve
    pub unit: Option<Unit>,
}
