//! Snapshot loading - Parses the JSON record embedded in each page into typed
//! reference data.
//!
//! A malformed snapshot is fatal: every loader returns
//! [`Error::MalformedSnapshot`] and the page is never built. Collections may be
//! serialized either as arrays or as objects keyed by id; both load into the
//! same ordered `Vec`.

use crate::{
    entities::{
        Category, IngredientUsage, IngredientWithPrice, IngredientWithPrices, ProductWithCost,
        Unit,
    },
    errors::{Error, Result},
};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use std::{collections::BTreeMap, collections::HashMap, io::Read, path::Path};
use tracing::debug;

/// Snapshot embedded in the product-edit page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEditSnapshot {
    /// The product being edited
    pub product: ProductWithCost,
    /// All categories, in display order
    pub categories: Vec<Category>,
    /// The product's recipe lines
    #[serde(default, deserialize_with = "seq_or_map")]
    pub ingredient_usages: Vec<IngredientUsage>,
    /// Every ingredient with its prices
    #[serde(deserialize_with = "seq_or_map")]
    pub ingredients: Vec<IngredientWithPrices>,
    /// Every known unit
    #[serde(deserialize_with = "seq_or_map")]
    pub units: Vec<Unit>,
}

/// Snapshot embedded in the ingredients page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientsSnapshot {
    /// Names of products that derived prices point at, keyed by product id
    #[serde(default)]
    pub product_names: HashMap<i64, String>,
    /// Every ingredient with its current price
    #[serde(default, deserialize_with = "seq_or_map")]
    pub ingredients: Vec<IngredientWithPrice>,
    /// Every known unit
    #[serde(deserialize_with = "seq_or_map")]
    pub units: Vec<Unit>,
}

macro_rules! snapshot_loaders {
    ($ty:ty, $label:literal) => {
        impl $ty {
            /// Parses the snapshot from its JSON text.
            ///
            /// # Errors
            /// Returns `MalformedSnapshot` if the text is not a valid record.
            pub fn from_json_str(text: &str) -> Result<Self> {
                let snapshot: Self = parse_snapshot(text.as_bytes(), $label)?;
                Ok(snapshot)
            }

            /// Parses the snapshot from a reader.
            ///
            /// # Errors
            /// Returns `MalformedSnapshot` if the content is not a valid record.
            pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
                parse_snapshot(reader, $label)
            }

            /// Reads and parses the snapshot from a file.
            ///
            /// # Errors
            /// Returns `Io` if the file cannot be opened and `MalformedSnapshot`
            /// if its content is not a valid record.
            pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
                let path_ref = path.as_ref();
                debug!("Loading {} snapshot from {:?}", $label, path_ref);
                let file = std::fs::File::open(path_ref)?;
                parse_snapshot(std::io::BufReader::new(file), $label)
            }
        }
    };
}

snapshot_loaders!(ProductEditSnapshot, "product edit");
snapshot_loaders!(IngredientsSnapshot, "ingredients");

fn parse_snapshot<T: DeserializeOwned, R: Read>(reader: R, label: &str) -> Result<T> {
    serde_json::from_reader(reader).map_err(|e| Error::MalformedSnapshot {
        message: format!("Failed to parse {label} snapshot: {e}"),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeqOrMap<T> {
    Seq(Vec<T>),
    Map(BTreeMap<String, T>),
}

/// Accepts `[a, b]`, `{"1": a, "2": b}` or `null` (empty).
///
/// Map entries come back in ascending numeric key order; non-numeric keys sort
/// after numeric ones.
fn seq_or_map<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<SeqOrMap<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(SeqOrMap::Seq(items)) => items,
        Some(SeqOrMap::Map(entries)) => {
            let mut keyed: Vec<(Option<i64>, T)> = entries
                .into_iter()
                .map(|(key, value)| (key.parse().ok(), value))
                .collect();
            keyed.sort_by_key(|(key, _)| key.map_or((1, 0), |k| (0, k)));
            keyed.into_iter().map(|(_, value)| value).collect()
        }
    })
}

/// Anything that can be indexed by an id.
pub trait Keyed {
    /// The record's id
    fn key(&self) -> i64;
}

impl Keyed for Unit {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for IngredientWithPrices {
    fn key(&self) -> i64 {
        self.id()
    }
}

/// Reference collection that keeps snapshot order and answers id lookups.
///
/// When several records share an id, lookups return the first one.
#[derive(Debug, Clone)]
pub struct Lookup<T> {
    items: Vec<T>,
    index: HashMap<i64, usize>,
}

impl<T: Keyed> Lookup<T> {
    /// Indexes `items` by id.
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            index.entry(item.key()).or_insert(position);
        }
        Self { items, index }
    }

    /// Finds the record with `id`.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&T> {
        self.index.get(&id).and_then(|&position| self.items.get(position))
    }

    /// Whether a record with `id` exists.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    /// Records in snapshot order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Lookup<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    const PRODUCT_EDIT_JSON: &str = r#"{
        "product": {
            "product": {"id": 1, "name": "Bread", "price": 4.5, "multiplicator": 3, "category_id": 2},
            "cost": 19
        },
        "categories": [{"id": 1, "name": "Drinks", "vat": 19}, {"id": 2, "name": "Bakery", "vat": 7}],
        "ingredient_usages": [
            {"id": 10, "quantity": 2, "unit_id": 1, "ingredient_id": 1, "product_id": 1}
        ],
        "ingredients": [
            {
                "ingredient": {"id": 1, "name": "Flour"},
                "prices": [{
                    "id": 100, "time_stamp": 1700000000, "price": 5, "quantity": 1,
                    "unit_id": 1, "ingredient_id": 1, "base_product_id": null
                }]
            }
        ],
        "units": [
            {"id": 1, "name": "g", "base_unit_id": null, "factor": 1},
            {"id": 2, "name": "kg", "base_unit_id": 1, "factor": 1000}
        ]
    }"#;

    #[test]
    fn test_parse_product_edit_snapshot() -> Result<()> {
        let snapshot = ProductEditSnapshot::from_json_str(PRODUCT_EDIT_JSON)?;

        assert_eq!(snapshot.product.product.name, "Bread");
        assert_eq!(snapshot.categories.len(), 2);
        assert_eq!(snapshot.ingredient_usages.len(), 1);
        assert_eq!(snapshot.ingredients[0].prices[0].price, 5.0);
        assert_eq!(snapshot.units[1].base_unit_id, Some(1));
        Ok(())
    }

    #[test]
    fn test_parse_id_keyed_collections() -> Result<()> {
        let json = r#"{
            "product_names": {"7": "House Milk"},
            "ingredients": {},
            "units": {
                "10": {"id": 10, "name": "ml", "base_unit_id": 2, "factor": 0.001},
                "2": {"id": 2, "name": "l", "base_unit_id": null, "factor": 1}
            }
        }"#;
        let snapshot = IngredientsSnapshot::from_json_str(json)?;

        assert_eq!(snapshot.product_names.get(&7).unwrap(), "House Milk");
        assert!(snapshot.ingredients.is_empty());
        let ids: Vec<i64> = snapshot.units.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 10]);
        Ok(())
    }

    #[test]
    fn test_null_usages_load_as_empty() -> Result<()> {
        let json = PRODUCT_EDIT_JSON.replace(
            r#"[
            {"id": 10, "quantity": 2, "unit_id": 1, "ingredient_id": 1, "product_id": 1}
        ]"#,
            "null",
        );
        let snapshot = ProductEditSnapshot::from_json_str(&json)?;
        assert!(snapshot.ingredient_usages.is_empty());
        assert_eq!(snapshot.ingredients.len(), 1);
        Ok(())
    }

    #[test]
    fn test_malformed_snapshot_is_rejected() {
        let result = ProductEditSnapshot::from_json_str("{\"product\": 12}");
        assert!(matches!(
            result.unwrap_err(),
            Error::MalformedSnapshot { message: _ }
        ));

        let result = IngredientsSnapshot::from_json_str("not json");
        assert!(matches!(
            result.unwrap_err(),
            Error::MalformedSnapshot { message: _ }
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = IngredientsSnapshot::from_path("/nonexistent/pricecalc/snapshot.json");
        assert!(matches!(result.unwrap_err(), Error::Io(_)));
    }

    #[test]
    fn test_snapshot_round_trips_through_reader() -> Result<()> {
        let original = product_edit_snapshot();
        let json = serde_json::to_vec(&original)?;
        let parsed = ProductEditSnapshot::from_reader(json.as_slice())?;

        assert_eq!(parsed.ingredients, original.ingredients);
        assert_eq!(parsed.ingredient_usages, original.ingredient_usages);
        Ok(())
    }

    #[test]
    fn test_lookup_keeps_order_and_first_duplicate() {
        let units = Lookup::new(vec![
            unit(3, "pcs", None, 1.0),
            unit(1, "g", None, 1.0),
            unit(3, "dup", None, 2.0),
        ]);

        assert_eq!(units.len(), 3);
        assert_eq!(units.get(3).unwrap().name, "pcs");
        assert!(units.contains(1));
        assert!(units.get(9).is_none());
        let names: Vec<&str> = units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["pcs", "g", "dup"]);
    }
}
