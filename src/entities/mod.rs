//! Entity module - Reference data and row types carried by page snapshots.
//! Raw rows reference each other by id; the `*Extended` rows are the
//! enriched forms the pages edit in place.

pub mod ingredient;
pub mod product;
pub mod unit;
pub mod usage;

pub use ingredient::{
    Ingredient, IngredientExtended, IngredientPrice, IngredientWithPrice, IngredientWithPrices,
};
pub use product::{Category, Product, ProductWithCost};
pub use unit::Unit;
pub use usage::{IngredientUsage, IngredientUsageExtended};
