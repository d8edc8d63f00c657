//! Core data models for vegsplit
//!
//! This module contains the data structures of a shared bill: expense items,
//! their categories, derived category totals and the split outcome.

pub mod ids;
pub mod item;
pub mod money;
pub mod split;
pub mod totals;

pub use ids::ItemId;
pub use item::{ExpenseItem, ExtractedItem, ItemCategory};
pub use money::{Money, MoneyParseError};
pub use split::{SplitResult, SplitValidationError, SplitWarning};
pub use totals::CategoryTotals;
