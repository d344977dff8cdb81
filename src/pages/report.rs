//! Plain-text rendering of page state.
//!
//! Produces the tables the host binary prints. Rows keep display order; all
//! money goes through [`format_money`].

use crate::{
    core::format::format_money,
    pages::{IngredientsPage, ProductEditPage},
};
use std::fmt::Write as _;

/// Renders one recipe line per row followed by the product cost.
///
/// Lines look like `  #10 Flour: 2.00 g -> 2.00 (base)`.
#[must_use]
pub fn render_product_edit(page: &ProductEditPage) -> String {
    let product = &page.product().product;
    let mut out = format!("{} (#{})\n", product.name, product.id);
    if let Some(category) = page.selected_category().and_then(|i| page.categories().get(i)) {
        let _ = writeln!(out, "Category: {} ({}% VAT)", category.name, category.vat);
    }
    for row in page.usages() {
        let ingredient = row
            .ingredient
            .as_ref()
            .map_or("?", |ingredient| ingredient.ingredient.name.as_str());
        let unit = row.unit.as_ref().map_or("?", |unit| unit.name.as_str());
        let marker = if row.editing { " [editing]" } else { "" };
        let _ = writeln!(
            out,
            "  #{} {}: {} {} -> {} (base){}",
            row.id,
            ingredient,
            format_money(row.quantity),
            unit,
            row.display_amount,
            marker
        );
    }
    let _ = writeln!(out, "Product cost: {}", page.product_cost());
    out
}

/// Renders one line per ingredient with its displayed price and the date the
/// price was recorded.
#[must_use]
pub fn render_ingredients(page: &IngredientsPage) -> String {
    let mut out = String::new();
    for row in page.ingredients() {
        let unit = row.unit.as_ref().map_or("?", |unit| unit.name.as_str());
        let recorded = row
            .price
            .recorded_at()
            .map_or_else(|| "unknown".to_string(), |at| at.format("%Y-%m-%d").to_string());
        let _ = write!(
            out,
            "  #{} {}: {} for {} {} (recorded {})",
            row.id, row.name, row.display_price, row.display_quantity, unit, recorded
        );
        if let Some(source) = page.base_product_name(row.id) {
            let _ = write!(out, " from {source}");
        }
        out.push('\n');
    }
    out
}
