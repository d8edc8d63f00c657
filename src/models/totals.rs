//! Per-category sums of a bill
//!
//! [`CategoryTotals`] is always derived from the item collection; it is never
//! edited directly.

use serde::{Deserialize, Serialize};

use super::item::{ExpenseItem, ItemCategory};
use super::money::Money;

/// Sums of a bill by category, reconciled against the declared total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryTotals {
    /// Sum of `Total` items (the declared bill amount)
    pub total: Money,
    /// Sum of `Shared` items
    pub shared: Money,
    /// Sum of `Vegetarian` items
    pub vegetarian: Money,
    /// Sum of `Non-Vegetarian` items
    pub non_vegetarian: Money,
}

impl CategoryTotals {
    /// Sum a collection of items by category
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a ExpenseItem>,
    {
        let mut totals = Self::default();
        for item in items {
            totals.add(item.category, item.amount);
        }
        totals
    }

    /// Add an amount to the bucket for a category
    pub fn add(&mut self, category: ItemCategory, amount: Money) {
        match category {
            ItemCategory::Total => self.total += amount,
            ItemCategory::Shared => self.shared += amount,
            ItemCategory::Vegetarian => self.vegetarian += amount,
            ItemCategory::NonVegetarian => self.non_vegetarian += amount,
        }
    }

    /// Everything attributed to a specific category
    pub fn itemized_total(&self) -> Money {
        self.shared + self.vegetarian + self.non_vegetarian
    }

    /// Declared total minus itemized entries
    ///
    /// Positive means unattributed taxes or fees; negative means the items add
    /// up to more than the declared total.
    pub fn remaining_amount(&self) -> Money {
        self.total - self.itemized_total()
    }

    /// The pool charged equally to everyone
    pub fn effective_shared(&self) -> Money {
        self.shared + self.remaining_amount()
    }

    pub fn is_over_itemized(&self) -> bool {
        self.remaining_amount().is_negative()
    }
}
