//! Unit entity - A measurement unit and its conversion into a base unit.
//!
//! Units form families: a base unit (no `base_unit_id`) plus every unit that
//! declares it as its base. `factor` converts one of this unit into the base
//! unit's quantity.

use serde::{Deserialize, Serialize};

/// Measurement unit reference data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier for the unit
    pub id: i64,
    /// Display name (e.g., "g", "kg", "l")
    pub name: String,
    /// Base unit this unit converts into, None if this is itself a base unit
    pub base_unit_id: Option<i64>,
    /// Quantity of the base unit represented by one of this unit
    pub factor: f64,
}

impl Unit {
    /// Returns true when this unit has no parent unit.
    #[must_use]
    pub const fn is_base(&self) -> bool {
        self.base_unit_id.is_none()
    }

    /// The id of the family this unit belongs to.
    #[must_use]
    pub fn family_id(&self) -> i64 {
        self.base_unit_id.unwrap_or(self.id)
    }
}
