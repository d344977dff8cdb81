//! Ingredients page view-model.
//!
//! Lists every ingredient with its current price. Reference integrity is not
//! guaranteed here, so rows whose unit does not resolve are still shown,
//! without a unit and with a zero display price.

use crate::{
    core::{
        cost,
        editing::EditableList,
        enrich::enrich_ingredient,
        events::{IngredientAdded, Subscription},
        format::{format_money, parse_decimal},
        units::filtered_units_for_id,
    },
    entities::{IngredientExtended, Unit},
    snapshot::{IngredientsSnapshot, Lookup},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What the "new ingredient" form creates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewIngredientType {
    /// An ingredient priced directly
    #[default]
    Price,
    /// An ingredient whose price derives from an existing product
    Product,
}

/// State of the ingredients page
#[derive(Debug)]
pub struct IngredientsPage {
    product_names: HashMap<i64, String>,
    units: Lookup<Unit>,
    ingredients: EditableList<IngredientExtended>,
    new_ingredient_type: NewIngredientType,
    subscription: Subscription<IngredientAdded>,
}

impl IngredientsPage {
    /// Builds the page from its snapshot and starts listening on
    /// `subscription`.
    #[must_use]
    pub fn new(snapshot: IngredientsSnapshot, subscription: Subscription<IngredientAdded>) -> Self {
        let IngredientsSnapshot {
            product_names,
            ingredients,
            units,
        } = snapshot;
        let units = Lookup::new(units);
        let rows: Vec<IngredientExtended> = ingredients
            .iter()
            .map(|ingredient| enrich_ingredient(ingredient, &units))
            .collect();

        info!(
            "Ingredients page ready with {} ingredients, {} units",
            rows.len(),
            units.len()
        );

        Self {
            product_names,
            units,
            ingredients: EditableList::new(rows),
            new_ingredient_type: NewIngredientType::default(),
            subscription,
        }
    }

    /// The live ingredient rows.
    #[must_use]
    pub const fn ingredients(&self) -> &EditableList<IngredientExtended> {
        &self.ingredients
    }

    /// Unit reference data.
    #[must_use]
    pub const fn units(&self) -> &Lookup<Unit> {
        &self.units
    }

    /// Current mode of the add form.
    #[must_use]
    pub const fn new_ingredient_type(&self) -> NewIngredientType {
        self.new_ingredient_type
    }

    /// Switches the add form between direct and product-derived prices.
    pub fn set_new_ingredient_type(&mut self, kind: NewIngredientType) {
        self.new_ingredient_type = kind;
    }

    /// Name of the product the ingredient's price derives from.
    #[must_use]
    pub fn base_product_name(&self, ingredient_id: i64) -> Option<&str> {
        let product_id = self.ingredients.get(ingredient_id)?.price.base_product_id?;
        self.product_names.get(&product_id).map(String::as_str)
    }

    /// Units convertible with `unit_id`.
    #[must_use]
    pub fn filtered_units_for_unit_id(&self, unit_id: i64) -> Vec<Unit> {
        filtered_units_for_id(unit_id, &self.units)
    }

    /// Stores an edited display price on the ingredient's price record.
    ///
    /// The text is converted back into a price per base unit. Returns false,
    /// leaving the price untouched, when the ingredient or its unit is
    /// unknown, the text is not a number, or the quantity is zero.
    pub fn set_ingredient_price(&mut self, ingredient_id: i64, display_price: &str) -> bool {
        let Some(row) = self.ingredients.get_mut(ingredient_id) else {
            return false;
        };
        row.display_price = display_price.to_string();
        let Some(unit) = self.units.get(row.price.unit_id) else {
            warn!("Unit {} not found, price of {} unchanged", row.price.unit_id, ingredient_id);
            return false;
        };
        let Some(stored) = parse_decimal(display_price)
            .and_then(|parsed| cost::price_from_display(parsed, row.price.quantity, unit))
        else {
            debug!("Rejected price '{}' for ingredient {}", display_price, ingredient_id);
            return false;
        };
        row.price.price = stored;
        true
    }

    /// Stores an edited display quantity on the ingredient's price record.
    ///
    /// Returns false, leaving the quantity untouched, when the ingredient is
    /// unknown or the text is not a number.
    pub fn set_ingredient_quantity(&mut self, ingredient_id: i64, display_quantity: &str) -> bool {
        let Some(row) = self.ingredients.get_mut(ingredient_id) else {
            return false;
        };
        row.display_quantity = display_quantity.to_string();
        let Some(parsed) = parse_decimal(display_quantity) else {
            debug!("Rejected quantity '{}' for ingredient {}", display_quantity, ingredient_id);
            return false;
        };
        row.price.quantity = parsed;
        true
    }

    /// Display price recomputed from the stored price record.
    #[must_use]
    pub fn current_display_price(&self, ingredient_id: i64) -> Option<String> {
        let row = self.ingredients.get(ingredient_id)?;
        let unit = row.unit.as_ref()?;
        Some(format_money(cost::display_price(&row.price, unit)))
    }

    /// Puts the ingredient into edit mode, returning it for editing.
    pub fn start_editing(&mut self, ingredient_id: i64) -> Option<&mut IngredientExtended> {
        self.ingredients.start_editing(ingredient_id)
    }

    /// Reverts the ingredient to its values from edit start and leaves edit
    /// mode.
    pub fn cancel_editing(&mut self, ingredient_id: i64) -> bool {
        self.ingredients.cancel_editing(ingredient_id)
    }

    /// Keeps the ingredient's edited values and leaves edit mode.
    pub fn finish_editing(&mut self, ingredient_id: i64) -> bool {
        self.ingredients.finish_editing(ingredient_id)
    }

    /// Removes the ingredient from the list.
    pub fn remove_item(&mut self, ingredient_id: i64) -> Option<IngredientExtended> {
        self.ingredients.remove_item(ingredient_id)
    }

    /// Puts the row at `index` into edit mode, returning it for editing.
    pub fn start_editing_at(&mut self, index: usize) -> Option<&mut IngredientExtended> {
        self.ingredients.start_editing_at(index)
    }

    /// Reverts the row at `index` and leaves edit mode.
    pub fn cancel_editing_at(&mut self, index: usize) -> bool {
        self.ingredients.cancel_editing_at(index)
    }

    /// Keeps the edited values of the row at `index`.
    pub fn finish_editing_at(&mut self, index: usize) -> bool {
        self.ingredients.finish_editing_at(index)
    }

    /// Removes the row at `index` from the list.
    pub fn remove_item_at(&mut self, index: usize) -> Option<IngredientExtended> {
        self.ingredients.remove_at(index)
    }

    /// Appends every queued ingredient notification to the list.
    ///
    /// Returns the number of rows appended.
    pub fn pump_events(&mut self) -> usize {
        let mut appended = 0;
        while let Some(IngredientAdded { new_ingredient }) = self.subscription.try_next() {
            let row = enrich_ingredient(&new_ingredient, &self.units);
            debug!("Ingredient {} added", row.id);
            self.ingredients.push(row);
            appended += 1;
        }
        if appended > 0 {
            info!("Appended {} new ingredients", appended);
        }
        appended
    }

    /// Waits for the next ingredient notification and appends it.
    ///
    /// Returns false once the subscription is closed and drained.
    pub async fn next_event(&mut self) -> bool {
        let Some(IngredientAdded { new_ingredient }) = self.subscription.next().await else {
            return false;
        };
        let row = enrich_ingredient(&new_ingredient, &self.units);
        self.ingredients.push(row);
        true
    }

    /// Stops listening for new ingredients.
    pub fn unsubscribe(&mut self) {
        self.subscription.unsubscribe();
    }
}
