//! Category aggregation
//!
//! Reduces the item collection to [`CategoryTotals`]. Called again after every
//! edit; there is no incremental bookkeeping.

use crate::models::{CategoryTotals, ExpenseItem};

/// Sum items by category
pub fn aggregate(items: &[ExpenseItem]) -> CategoryTotals {
    CategoryTotals::from_items(items)
}
