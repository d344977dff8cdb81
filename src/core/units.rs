//! Unit family lookups.

use crate::{entities::Unit, snapshot::Lookup};
use tracing::trace;

/// Conversion of one `unit` into its base unit's terms.
#[must_use]
pub const fn unit_conversion_factor(unit: &Unit) -> f64 {
    unit.factor
}

/// Every unit in the family of `unit_id`: the base unit plus all units that
/// declare it as their base, in collection order.
///
/// Returns an empty list when `unit_id` is not a known unit.
#[must_use]
pub fn filtered_units_for_id(unit_id: i64, units: &Lookup<Unit>) -> Vec<Unit> {
    let Some(unit) = units.get(unit_id) else {
        trace!("Unit {} not found, no family to offer", unit_id);
        return Vec::new();
    };
    let base_id = unit.family_id();
    units
        .iter()
        .filter(|candidate| candidate.id == base_id || candidate.base_unit_id == Some(base_id))
        .cloned()
        .collect()
}
