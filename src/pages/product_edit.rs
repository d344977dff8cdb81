//! Product-edit page view-model.
//!
//! Holds the product's recipe lines as enriched rows, the reference data they
//! were joined against and the "add ingredient" form state. Every recipe line
//! must resolve against the reference data: a usage with an unknown unit or
//! ingredient fails page construction, and fails the event pump when it
//! arrives as a notification.

use crate::{
    core::{
        cost,
        editing::EditableList,
        enrich::enrich_usage,
        events::{Subscription, UsageAdded},
        format::format_money,
        units::filtered_units_for_id,
    },
    entities::{Category, IngredientUsageExtended, IngredientWithPrices, ProductWithCost, Unit},
    errors::Result,
    snapshot::{Lookup, ProductEditSnapshot},
};
use tracing::{debug, info, warn};

/// State of the product-edit page
#[derive(Debug)]
pub struct ProductEditPage {
    product: ProductWithCost,
    categories: Vec<Category>,
    ingredients: Lookup<IngredientWithPrices>,
    units: Lookup<Unit>,
    usages: EditableList<IngredientUsageExtended>,
    selected_category: Option<usize>,
    new_ingredient_id: i64,
    new_ingredient_amount: f64,
    new_ingredient_unit_id: i64,
    subscription: Subscription<UsageAdded>,
}

impl ProductEditPage {
    /// Builds the page from its snapshot and starts listening on
    /// `subscription`.
    ///
    /// # Errors
    /// Returns `MissingReference` if any usage names an unknown unit or
    /// ingredient.
    pub fn new(
        snapshot: ProductEditSnapshot,
        subscription: Subscription<UsageAdded>,
    ) -> Result<Self> {
        let ProductEditSnapshot {
            product,
            categories,
            ingredient_usages,
            ingredients,
            units,
        } = snapshot;
        let units = Lookup::new(units);
        let ingredients = Lookup::new(ingredients);

        let rows = ingredient_usages
            .iter()
            .map(|usage| enrich_usage(usage, &units, &ingredients))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|e| warn!("Product {} cannot be edited: {}", product.product.id, e))?;

        let selected_category = categories
            .iter()
            .position(|category| category.id == product.product.category_id);

        info!(
            "Product edit page for '{}' ready with {} usages, {} ingredients, {} units",
            product.product.name,
            rows.len(),
            ingredients.len(),
            units.len()
        );

        Ok(Self {
            product,
            categories,
            ingredients,
            units,
            usages: EditableList::new(rows),
            selected_category,
            new_ingredient_id: 0,
            new_ingredient_amount: 0.0,
            new_ingredient_unit_id: 0,
            subscription,
        })
    }

    /// The product being edited.
    #[must_use]
    pub const fn product(&self) -> &ProductWithCost {
        &self.product
    }

    /// All categories, in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Ingredient reference data.
    #[must_use]
    pub const fn ingredients(&self) -> &Lookup<IngredientWithPrices> {
        &self.ingredients
    }

    /// Unit reference data.
    #[must_use]
    pub const fn units(&self) -> &Lookup<Unit> {
        &self.units
    }

    /// The live recipe lines.
    #[must_use]
    pub const fn usages(&self) -> &EditableList<IngredientUsageExtended> {
        &self.usages
    }

    /// Index into [`categories`](Self::categories) of the selected category,
    /// None when the product's category is not listed.
    #[must_use]
    pub const fn selected_category(&self) -> Option<usize> {
        self.selected_category
    }

    /// Selects a category by index. Out-of-range indexes are ignored.
    pub fn select_category(&mut self, index: usize) -> Option<&Category> {
        let category = self.categories.get(index)?;
        self.selected_category = Some(index);
        Some(category)
    }

    /// Units convertible with `unit_id`.
    #[must_use]
    pub fn filtered_units_for_unit_id(&self, unit_id: i64) -> Vec<Unit> {
        filtered_units_for_id(unit_id, &self.units)
    }

    /// Unit of the ingredient's current price, if it has one.
    #[must_use]
    pub fn safe_unit_id_from_ingredient(&self, ingredient_id: i64) -> Option<i64> {
        cost::safe_unit_id_for_ingredient(ingredient_id, &self.ingredients)
    }

    /// Picks the ingredient for the add form and resets the form's unit to
    /// that ingredient's price unit, or 0 if it has none.
    pub fn select_new_ingredient(&mut self, ingredient_id: i64) {
        self.new_ingredient_id = ingredient_id;
        self.new_ingredient_unit_id = self.safe_unit_id_from_ingredient(ingredient_id).unwrap_or(0);
        debug!(
            "New ingredient {} selected, unit {}",
            ingredient_id, self.new_ingredient_unit_id
        );
    }

    /// Sets the amount typed into the add form.
    pub fn set_new_ingredient_amount(&mut self, amount: f64) {
        self.new_ingredient_amount = amount;
    }

    /// Sets the unit chosen in the add form.
    pub fn set_new_ingredient_unit(&mut self, unit_id: i64) {
        self.new_ingredient_unit_id = unit_id;
    }

    /// Ingredient selected in the add form.
    #[must_use]
    pub const fn new_ingredient_id(&self) -> i64 {
        self.new_ingredient_id
    }

    /// Unit selected in the add form.
    #[must_use]
    pub const fn new_ingredient_unit_id(&self) -> i64 {
        self.new_ingredient_unit_id
    }

    /// Cost of the ingredient being added, two decimals.
    ///
    /// `"0.00"` when the ingredient or unit is unknown, the ingredient has no
    /// price, or the amount is not a number.
    #[must_use]
    pub fn new_ingredient_cost(&self) -> String {
        let Some(price) = self
            .ingredients
            .get(self.new_ingredient_id)
            .and_then(cost::current_price)
        else {
            return format_money(0.0);
        };
        let Some(unit) = self.units.get(self.new_ingredient_unit_id) else {
            return format_money(0.0);
        };
        if self.new_ingredient_amount.is_nan() {
            return format_money(0.0);
        }
        format_money(cost::new_item_cost(price, self.new_ingredient_amount, unit))
    }

    /// Total cost of all recipe lines with a priced ingredient, two decimals.
    #[must_use]
    pub fn product_cost(&self) -> String {
        format_money(cost::aggregate_cost(&self.usages, &self.ingredients))
    }

    /// Puts the usage into edit mode, returning it for editing.
    pub fn start_editing(&mut self, usage_id: i64) -> Option<&mut IngredientUsageExtended> {
        self.usages.start_editing(usage_id)
    }

    /// Reverts the usage to its values from edit start and leaves edit mode.
    pub fn cancel_editing(&mut self, usage_id: i64) -> bool {
        self.usages.cancel_editing(usage_id)
    }

    /// Keeps the usage's edited values and leaves edit mode.
    pub fn finish_editing(&mut self, usage_id: i64) -> bool {
        self.usages.finish_editing(usage_id)
    }

    /// Removes the usage from the recipe.
    pub fn remove_usage(&mut self, usage_id: i64) -> Option<IngredientUsageExtended> {
        self.usages.remove_item(usage_id)
    }

    /// Puts the usage at `index` into edit mode, returning it for editing.
    ///
    /// Reaches rows that share an id with an earlier row.
    pub fn start_editing_at(&mut self, index: usize) -> Option<&mut IngredientUsageExtended> {
        self.usages.start_editing_at(index)
    }

    /// Reverts the usage at `index` and leaves edit mode.
    pub fn cancel_editing_at(&mut self, index: usize) -> bool {
        self.usages.cancel_editing_at(index)
    }

    /// Keeps the edited values of the usage at `index`.
    pub fn finish_editing_at(&mut self, index: usize) -> bool {
        self.usages.finish_editing_at(index)
    }

    /// Removes the usage at `index` from the recipe.
    pub fn remove_usage_at(&mut self, index: usize) -> Option<IngredientUsageExtended> {
        self.usages.remove_at(index)
    }

    /// Appends every queued usage notification to the recipe.
    ///
    /// Returns the number of rows appended.
    ///
    /// # Errors
    /// Stops at the first usage that does not resolve and returns
    /// `MissingReference`; notifications behind it stay queued.
    pub fn pump_events(&mut self) -> Result<usize> {
        let mut appended = 0;
        while let Some(UsageAdded { ingredient_usage }) = self.subscription.try_next() {
            let row = enrich_usage(&ingredient_usage, &self.units, &self.ingredients)?;
            debug!("Usage {} added to product {}", row.id, self.product.product.id);
            self.usages.push(row);
            appended += 1;
        }
        if appended > 0 {
            info!("Appended {} new usages", appended);
        }
        Ok(appended)
    }

    /// Waits for the next usage notification and appends it.
    ///
    /// Returns false once the subscription is closed and drained.
    ///
    /// # Errors
    /// Returns `MissingReference` if the usage does not resolve.
    pub async fn next_event(&mut self) -> Result<bool> {
        let Some(UsageAdded { ingredient_usage }) = self.subscription.next().await else {
            return Ok(false);
        };
        let row = enrich_usage(&ingredient_usage, &self.units, &self.ingredients)?;
        self.usages.push(row);
        Ok(true)
    }

    /// Stops listening for new usages.
    pub fn unsubscribe(&mut self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::events::Notifier,
        errors::{Error, ReferenceKind},
        test_utils::*,
    };

    fn page() -> Result<(Notifier<UsageAdded>, ProductEditPage)> {
        init_test_tracing();
        let (notifier, subscription) = usage_channel();
        let page = ProductEditPage::new(product_edit_snapshot(), subscription)?;
        Ok((notifier, page))
    }

    fn usage_ids(page: &ProductEditPage) -> Vec<i64> {
        page.usages().iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_init_enriches_usages() -> Result<()> {
        let (_notifier, page) = page()?;

        assert_eq!(usage_ids(&page), vec![10, 11]);
        let first = page.usages().get(10).unwrap();
        assert_eq!(first.display_amount, "2.00");
        assert_eq!(first.ingredient.as_ref().unwrap().ingredient.name, "Flour");
        assert!(!first.editing);
        assert_eq!(page.selected_category(), Some(1));
        Ok(())
    }

    #[test]
    fn test_init_fails_on_unresolved_usage() {
        let mut snapshot = product_edit_snapshot();
        snapshot.ingredient_usages.push(usage(12, 99, 1.0, 1));
        let (_notifier, subscription) = usage_channel();

        let result = ProductEditPage::new(snapshot, subscription);
        assert!(matches!(
            result.unwrap_err(),
            Error::MissingReference {
                row_id: 12,
                kind: ReferenceKind::Ingredient,
                id: 99
            }
        ));
    }

    #[test]
    fn test_product_cost() -> Result<()> {
        let (_notifier, page) = page()?;
        assert_eq!(page.product_cost(), "19.00");
        Ok(())
    }

    #[test]
    fn test_product_cost_skips_unpriced_ingredient() -> Result<()> {
        let (notifier, mut page) = page()?;
        notifier.notify(UsageAdded {
            ingredient_usage: usage(12, 3, 50.0, 1),
        })?;

        assert_eq!(page.pump_events()?, 1);
        assert_eq!(page.product_cost(), "19.00");
        Ok(())
    }

    #[test]
    fn test_product_cost_follows_edits_and_removal() -> Result<()> {
        let (_notifier, mut page) = page()?;

        page.start_editing(10).unwrap().quantity = 4.0;
        assert_eq!(page.product_cost(), "29.00");

        assert!(page.cancel_editing(10));
        assert_eq!(page.product_cost(), "19.00");

        page.remove_usage(11);
        assert_eq!(page.product_cost(), "10.00");
        Ok(())
    }

    #[test]
    fn test_new_ingredient_cost() -> Result<()> {
        let (_notifier, mut page) = page()?;
        assert_eq!(page.new_ingredient_cost(), "0.00");

        page.select_new_ingredient(1);
        assert_eq!(page.new_ingredient_unit_id(), 1);
        page.set_new_ingredient_amount(3.0);
        assert_eq!(page.new_ingredient_cost(), "15.00");

        page.set_new_ingredient_unit(2);
        page.set_new_ingredient_amount(300.0);
        assert_eq!(page.new_ingredient_cost(), "1.50");

        page.set_new_ingredient_amount(f64::NAN);
        assert_eq!(page.new_ingredient_cost(), "0.00");
        Ok(())
    }

    #[test]
    fn test_selecting_unpriced_ingredient_resets_unit() -> Result<()> {
        let (_notifier, mut page) = page()?;
        page.select_new_ingredient(1);
        page.set_new_ingredient_amount(1.0);

        page.select_new_ingredient(3);
        assert_eq!(page.new_ingredient_id(), 3);
        assert_eq!(page.new_ingredient_unit_id(), 0);
        assert_eq!(page.new_ingredient_cost(), "0.00");
        assert_eq!(page.safe_unit_id_from_ingredient(404), None);
        Ok(())
    }

    #[test]
    fn test_filtered_units_for_unit_id() -> Result<()> {
        let (_notifier, page) = page()?;
        let ids: Vec<i64> = page.filtered_units_for_unit_id(2).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(page.filtered_units_for_unit_id(404).is_empty());
        Ok(())
    }

    #[test]
    fn test_select_category() -> Result<()> {
        let (_notifier, mut page) = page()?;
        assert_eq!(page.select_category(0).unwrap().name, "Drinks");
        assert_eq!(page.selected_category(), Some(0));
        assert!(page.select_category(9).is_none());
        assert_eq!(page.selected_category(), Some(0));
        Ok(())
    }

    #[test]
    fn test_pump_appends_duplicates() -> Result<()> {
        let (notifier, mut page) = page()?;
        let added = UsageAdded {
            ingredient_usage: usage(12, 2, 1.0, 2),
        };
        notifier.notify(added.clone())?;
        notifier.notify(added)?;

        assert_eq!(page.pump_events()?, 2);
        assert_eq!(usage_ids(&page), vec![10, 11, 12, 12]);
        assert_eq!(page.usages().get(12).unwrap().display_amount, "1000.00");
        Ok(())
    }

    #[test]
    fn test_readded_usage_is_not_overwritten_by_removed_one() -> Result<()> {
        let (notifier, mut page) = page()?;
        page.start_editing(11).unwrap();
        page.remove_usage(11).unwrap();
        assert!(page.usages().backup().is_empty());

        notifier.notify(UsageAdded {
            ingredient_usage: usage(11, 1, 7.0, 2),
        })?;
        assert_eq!(page.pump_events()?, 1);

        assert!(page.cancel_editing(11));
        let row = page.usages().get(11).unwrap();
        assert_eq!(row.ingredient_id, 1);
        assert_eq!(row.quantity, 7.0);
        assert_eq!(row.unit_id, 2);
        Ok(())
    }

    #[test]
    fn test_duplicate_usage_can_be_edited_and_removed() -> Result<()> {
        let (notifier, mut page) = page()?;
        for _ in 0..2 {
            notifier.notify(UsageAdded {
                ingredient_usage: usage(12, 1, 1.0, 1),
            })?;
        }
        assert_eq!(page.pump_events()?, 2);

        page.start_editing(12).unwrap();
        page.start_editing_at(3).unwrap().quantity = 3.0;
        let flags: Vec<bool> = page
            .usages()
            .iter()
            .filter(|u| u.id == 12)
            .map(|u| u.editing)
            .collect();
        assert_eq!(flags, vec![true, true]);
        assert_eq!(page.product_cost(), "39.00");

        assert!(page.finish_editing_at(3));
        assert!(!page.usages().get_at(3).unwrap().editing);
        assert!(page.cancel_editing_at(2));
        assert_eq!(page.product_cost(), "39.00");

        assert_eq!(page.remove_usage_at(3).unwrap().quantity, 3.0);
        assert_eq!(usage_ids(&page), vec![10, 11, 12]);
        assert_eq!(page.product_cost(), "24.00");
        Ok(())
    }

    #[test]
    fn test_pump_stops_at_unresolved_usage() -> Result<()> {
        let (notifier, mut page) = page()?;
        notifier.notify(UsageAdded {
            ingredient_usage: usage(12, 1, 1.0, 77),
        })?;
        notifier.notify(UsageAdded {
            ingredient_usage: usage(13, 1, 1.0, 1),
        })?;

        assert!(matches!(
            page.pump_events().unwrap_err(),
            Error::MissingReference {
                row_id: 12,
                kind: ReferenceKind::Unit,
                id: 77
            }
        ));
        assert_eq!(usage_ids(&page), vec![10, 11]);

        assert_eq!(page.pump_events()?, 1);
        assert_eq!(usage_ids(&page), vec![10, 11, 13]);
        Ok(())
    }

    #[test]
    fn test_unsubscribe_closes_notifier() -> Result<()> {
        let (notifier, mut page) = page()?;
        page.unsubscribe();

        let result = notifier.notify(UsageAdded {
            ingredient_usage: usage(12, 1, 1.0, 1),
        });
        assert!(matches!(result.unwrap_err(), Error::SubscriptionClosed));
        assert_eq!(page.pump_events()?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_next_event_appends_usage() -> Result<()> {
        let (notifier, mut page) = page()?;
        notifier.notify(UsageAdded {
            ingredient_usage: usage(12, 1, 1.0, 1),
        })?;
        drop(notifier);

        assert!(page.next_event().await?);
        assert!(!page.next_event().await?);
        assert_eq!(usage_ids(&page), vec![10, 11, 12]);
        Ok(())
    }
}
