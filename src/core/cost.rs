//! Derived cost calculations.
//!
//! Everything here is a pure function over the current in-memory rows and is
//! recomputed on each call. Results are plain `f64`; callers format them with
//! [`format_money`](super::format::format_money) as the last step.
//!
//! Two formulas coexist and are kept distinct: [`line_cost`] multiplies the
//! current price by the usage quantity as entered, while [`new_item_cost`]
//! additionally divides by the target unit's factor.

use crate::{
    core::units::unit_conversion_factor,
    entities::{IngredientPrice, IngredientUsageExtended, IngredientWithPrices, Unit},
    snapshot::Lookup,
};
use tracing::trace;

/// The price used for costing: the first record, if any.
#[must_use]
pub fn current_price(ingredient: &IngredientWithPrices) -> Option<&IngredientPrice> {
    ingredient.prices.first()
}

/// Cost of one recipe line: `price * quantity`.
#[must_use]
pub fn line_cost(usage: &IngredientUsageExtended, current_price: &IngredientPrice) -> f64 {
    current_price.price * usage.quantity
}

/// Cost of adding `requested_amount` of an ingredient in `target_unit`:
/// `price * amount / factor`.
#[must_use]
pub fn new_item_cost(price: &IngredientPrice, requested_amount: f64, target_unit: &Unit) -> f64 {
    price.price * requested_amount / target_unit.factor
}

/// Sum of [`line_cost`] over every row whose ingredient resolves and has a
/// current price. Rows without a price are left out of the sum.
#[must_use]
pub fn aggregate_cost<'a, I>(rows: I, ingredients: &Lookup<IngredientWithPrices>) -> f64
where
    I: IntoIterator<Item = &'a IngredientUsageExtended>,
{
    rows.into_iter()
        .filter_map(|row| {
            let price = ingredients.get(row.ingredient_id).and_then(current_price);
            if price.is_none() {
                trace!("Usage {} has no priced ingredient, skipped", row.id);
            }
            price.map(|price| line_cost(row, price))
        })
        .sum()
}

/// Unit of the ingredient's current price, None when the ingredient is
/// unknown or has no prices.
#[must_use]
pub fn safe_unit_id_for_ingredient(
    ingredient_id: i64,
    ingredients: &Lookup<IngredientWithPrices>,
) -> Option<i64> {
    ingredients
        .get(ingredient_id)
        .and_then(current_price)
        .map(|price| price.unit_id)
}

/// Price for the displayed quantity on the ingredients page:
/// `price / factor * quantity`.
#[must_use]
pub fn display_price(price: &IngredientPrice, unit: &Unit) -> f64 {
    price.price / unit_conversion_factor(unit) * price.quantity
}

/// Inverse of [`display_price`]: the stored price for an edited display value.
///
/// Returns None when the result is not a finite number, e.g. for a zero
/// quantity.
#[must_use]
pub fn price_from_display(displayed: f64, quantity: f64, unit: &Unit) -> Option<f64> {
    let stored = displayed / quantity * unit.factor;
    stored.is_finite().then_some(stored)
}
