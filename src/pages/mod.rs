//! Page view-models - The state behind each admin page and the operations the
//! binding layer calls.

/// Ingredient price list page
pub mod ingredients;
/// Product recipe editing page
pub mod product_edit;
/// Plain-text rendering for the host binary
pub mod report;

pub use ingredients::{IngredientsPage, NewIngredientType};
pub use product_edit::ProductEditPage;
