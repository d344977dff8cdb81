//! Ingredient usage entities - Line items of a product's recipe.

use serde::{Deserialize, Serialize};

use super::{IngredientWithPrices, Unit};

/// "This product uses `quantity` of this ingredient, measured in this unit."
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientUsage {
    /// Unique identifier for the usage
    pub id: i64,
    /// Amount used, in `unit_id`
    pub quantity: f64,
    /// Unit the quantity is measured in
    pub unit_id: i64,
    /// Ingredient being used
    pub ingredient_id: i64,
    /// Product the usage belongs to
    pub product_id: i64,
}

/// Product-edit page row: a usage joined with its unit and ingredient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientUsageExtended {
    /// Unique identifier for the usage
    pub id: i64,
    /// Amount used, in `unit_id`
    pub quantity: f64,
    /// Unit the quantity is measured in
    pub unit_id: i64,
    /// Ingredient being used
    pub ingredient_id: i64,
    /// Product the usage belongs to
    pub product_id: i64,
    /// Joined unit
    pub unit: Option<Unit>,
    /// Joined ingredient with its prices
    pub ingredient: Option<IngredientWithPrices>,
    /// Row is in edit mode
    pub editing: bool,
    /// Quantity converted to the base unit, two decimals
    pub display_amount: String,
}

impl IngredientUsageExtended {
    /// Strips the joined and display fields, returning the raw usage.
    #[must_use]
    pub const fn to_usage(&self) -> IngredientUsage {
        IngredientUsage {
            id: self.id,
            quantity: self.quantity,
            unit_id: self.unit_id,
            ingredient_id: self.ingredient_id,
            product_id: self.product_id,
        }
    }
}
