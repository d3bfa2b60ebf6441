//! Symbolic value reference data
//!
//! Every categorical field in the portal (order kind, statuses, units,
//! entity types, file roles) is persisted as a surrogate id into the
//! `symbolic_value` table rather than as a native enum. The rows are
//! seeded at deployment time and treated as read-mostly reference data.

use serde::{Deserialize, Serialize};

/// One row of the symbolic value lookup table.
///
/// Invariant: within a category, `symbol` is unique (case-sensitive)
/// among active rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SymbolicValue {
    /// Surrogate id, opaque to callers
    pub id: i64,
    /// Category name, e.g. `order_status`
    pub category: String,
    /// Symbolic string, e.g. `IN_PROGRESS`
    pub symbol: String,
    /// Display label for UIs
    pub display_name: String,
    /// Display ordering within the category
    pub sort_order: i64,
    /// Inactive rows are kept for historical references but never resolved
    pub is_active: bool,
}

/// Binding between a closed Rust enum and its symbol-table category.
///
/// The persistence layer stores surrogate ids; everything else works
/// with these enums. `FALLBACK_CATEGORY` is the explicit, per-type
/// fallback inherited from the legacy schema (e.g. quote statuses may
/// be seeded under `order_status`). Resolution tries `CATEGORY` first,
/// then the fallback, nothing else.
pub trait SymbolCoded: Sized + Copy + 'static {
    /// Primary symbol-table category for this type
    const CATEGORY: &'static str;
    /// Optional legacy fallback category, tried after `CATEGORY`
    const FALLBACK_CATEGORY: Option<&'static str> = None;
    /// Every variant, used by the startup seed verification
    const ALL: &'static [Self];

    /// The symbolic string stored in the lookup table
    fn symbol(&self) -> &'static str;

    /// Parse a symbolic string back into the enum
    fn from_symbol(symbol: &str) -> Option<Self>;
}
