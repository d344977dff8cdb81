//! Enrichment - Joins raw rows against reference data and attaches display
//! fields.
//!
//! Two resolution policies exist and each call site picks one:
//! - [`enrich_usage`] is strict. Every recipe line must resolve, so a missing
//!   unit or ingredient fails with [`Error::MissingReference`].
//! - [`enrich_ingredient`] is lenient. A price whose unit is unknown still
//!   produces a row, without a unit and with a zero display price.

use crate::{
    core::{cost, format::format_money, units::unit_conversion_factor},
    entities::{
        IngredientExtended, IngredientUsage, IngredientUsageExtended, IngredientWithPrice,
        IngredientWithPrices, Unit,
    },
    errors::{Error, ReferenceKind, Result},
    snapshot::Lookup,
};
use tracing::warn;

/// Enriches a recipe line with its unit and ingredient.
///
/// `display_amount` is the quantity converted into the base unit.
///
/// # Errors
/// Returns `MissingReference` if the unit or the ingredient does not resolve.
pub fn enrich_usage(
    usage: &IngredientUsage,
    units: &Lookup<Unit>,
    ingredients: &Lookup<IngredientWithPrices>,
) -> Result<IngredientUsageExtended> {
    let unit = units.get(usage.unit_id).ok_or(Error::MissingReference {
        row_id: usage.id,
        kind: ReferenceKind::Unit,
        id: usage.unit_id,
    })?;
    let ingredient = ingredients
        .get(usage.ingredient_id)
        .ok_or(Error::MissingReference {
            row_id: usage.id,
            kind: ReferenceKind::Ingredient,
            id: usage.ingredient_id,
        })?;

    Ok(IngredientUsageExtended {
        id: usage.id,
        quantity: usage.quantity,
        unit_id: usage.unit_id,
        ingredient_id: usage.ingredient_id,
        product_id: usage.product_id,
        display_amount: format_money(usage.quantity * unit_conversion_factor(unit)),
        unit: Some(unit.clone()),
        ingredient: Some(ingredient.clone()),
        editing: false,
    })
}

/// Enriches an ingredients-page row with its price unit.
///
/// Never fails: an unresolved unit is logged and the row keeps `unit = None`
/// with a display price of `"0.00"`.
#[must_use]
pub fn enrich_ingredient(
    ingredient: &IngredientWithPrice,
    units: &Lookup<Unit>,
) -> IngredientExtended {
    let price = &ingredient.price;
    let unit = units.get(price.unit_id);
    let display_price = unit.map_or_else(
        || {
            warn!(
                "Unit {} of ingredient {} not found, showing it without a price",
                price.unit_id, ingredient.id
            );
            format_money(0.0)
        },
        |unit| format_money(cost::display_price(price, unit)),
    );

    IngredientExtended {
        id: ingredient.id,
        name: ingredient.name.clone(),
        price: price.clone(),
        is_base: price.is_base(),
        editing: false,
        display_price,
        display_quantity: format_money(price.quantity),
        unit: unit.cloned(),
    }
}
