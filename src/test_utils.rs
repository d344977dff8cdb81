//! Shared test utilities for `pricecalc`.
//!
//! This module provides helper functions for building reference data and
//! snapshots with sensible defaults.

use crate::{
    core::events::{self, IngredientAdded, Subscription, UsageAdded},
    entities::{
        Category, Ingredient, IngredientPrice, IngredientUsage, IngredientWithPrice,
        IngredientWithPrices, Product, ProductWithCost, Unit,
    },
    snapshot::{IngredientsSnapshot, ProductEditSnapshot},
};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates a unit.
pub fn unit(id: i64, name: &str, base_unit_id: Option<i64>, factor: f64) -> Unit {
    Unit {
        id,
        name: name.to_string(),
        base_unit_id,
        factor,
    }
}

/// Grams, kilograms and pieces.
///
/// # Defaults
/// * 1 `g`: base unit
/// * 2 `kg`: 1000 g
/// * 3 `pcs`: separate base unit
pub fn test_units() -> Vec<Unit> {
    vec![
        unit(1, "g", None, 1.0),
        unit(2, "kg", Some(1), 1000.0),
        unit(3, "pcs", None, 1.0),
    ]
}

/// Creates a directly-priced price record.
///
/// # Defaults
/// * `time_stamp`: 1 700 000 000
/// * `base_product_id`: None
pub fn price(
    id: i64,
    ingredient_id: i64,
    price: f64,
    quantity: f64,
    unit_id: i64,
) -> IngredientPrice {
    IngredientPrice {
        id,
        time_stamp: 1_700_000_000,
        price,
        quantity,
        unit_id,
        ingredient_id,
        base_product_id: None,
    }
}

/// Creates an ingredient whose prices are given as `(price, unit_id)` pairs,
/// each with quantity 1.
pub fn ingredient_with_prices(id: i64, name: &str, prices: &[(f64, i64)]) -> IngredientWithPrices {
    IngredientWithPrices {
        ingredient: Ingredient {
            id,
            name: name.to_string(),
        },
        prices: prices
            .iter()
            .enumerate()
            .map(|(index, &(amount, unit_id))| {
                let price_id = id * 100 + i64::try_from(index).unwrap_or_default();
                price(price_id, id, amount, 1.0, unit_id)
            })
            .collect(),
    }
}

/// Creates an ingredients-page row.
pub fn ingredient_with_price(
    id: i64,
    name: &str,
    amount: f64,
    quantity: f64,
    unit_id: i64,
) -> IngredientWithPrice {
    IngredientWithPrice {
        id,
        name: name.to_string(),
        price: price(id * 100, id, amount, quantity, unit_id),
    }
}

/// Creates a usage for product 1.
pub fn usage(id: i64, ingredient_id: i64, quantity: f64, unit_id: i64) -> IngredientUsage {
    IngredientUsage {
        id,
        quantity,
        unit_id,
        ingredient_id,
        product_id: 1,
    }
}

/// Product-edit snapshot with two priced ingredients and two usages.
///
/// # Defaults
/// * Flour (id 1): 5.0 per g
/// * Sugar (id 2): 3.0 per g
/// * Salt (id 3): no prices
/// * usages: 2 g flour (id 10), 3 g sugar (id 11)
pub fn product_edit_snapshot() -> ProductEditSnapshot {
    ProductEditSnapshot {
        product: ProductWithCost {
            product: Product {
                id: 1,
                name: "Bread".to_string(),
                price: 4.5,
                multiplicator: 3.0,
                category_id: 2,
            },
            cost: 19.0,
        },
        categories: vec![
            Category {
                id: 1,
                name: "Drinks".to_string(),
                vat: 19,
            },
            Category {
                id: 2,
                name: "Bakery".to_string(),
                vat: 7,
            },
        ],
        ingredient_usages: vec![usage(10, 1, 2.0, 1), usage(11, 2, 3.0, 1)],
        ingredients: vec![
            ingredient_with_prices(1, "Flour", &[(5.0, 1)]),
            ingredient_with_prices(2, "Sugar", &[(3.0, 1)]),
            ingredient_with_prices(3, "Salt", &[]),
        ],
        units: test_units(),
    }
}

/// Ingredients-page snapshot.
///
/// # Defaults
/// * Butter (id 1): 8.0 per g, 250 g
/// * Milk (id 2): 1.2 for 1 kg, derived from product 7 "House Milk"
pub fn ingredients_snapshot() -> IngredientsSnapshot {
    let mut milk = ingredient_with_price(2, "Milk", 1.2, 1.0, 2);
    milk.price.base_product_id = Some(7);

    IngredientsSnapshot {
        product_names: HashMap::from([(7, "House Milk".to_string())]),
        ingredients: vec![ingredient_with_price(1, "Butter", 8.0, 250.0, 1), milk],
        units: test_units(),
    }
}

/// A notification channel for the product-edit page.
pub fn usage_channel() -> (events::Notifier<UsageAdded>, Subscription<UsageAdded>) {
    events::channel()
}

/// A notification channel for the ingredients page.
pub fn ingredient_channel() -> (events::Notifier<IngredientAdded>, Subscription<IngredientAdded>) {
    events::channel()
}
