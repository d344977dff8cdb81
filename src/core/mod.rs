//! Core logic - Framework-agnostic enrichment, editing, costing and event
//! delivery used by both page view-models.

/// Derived cost calculations
pub mod cost;
/// Reversible per-row edit sessions
pub mod editing;
/// Reference joins and display fields
pub mod enrich;
/// Item-added notification channel
pub mod events;
/// Money formatting and decimal parsing
pub mod format;
/// Unit families
pub mod units;
