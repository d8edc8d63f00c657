//! Expense items and their dietary categories
//!
//! An [`ExpenseItem`] is one row of the bill: either the declared grand total
//! (category [`ItemCategory::Total`]) or an itemized line attributed to
//! everyone, to vegetarians only, or to non-vegetarians only.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ItemId;
use super::money::Money;

/// Who pays for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemCategory {
    /// The declared bill total (anything not itemized is shared)
    #[default]
    Total,
    /// Split equally across everyone
    Shared,
    /// Split across vegetarians only
    Vegetarian,
    /// Split across non-vegetarians only
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
}

impl ItemCategory {
    /// All categories in display order
    pub const ALL: [ItemCategory; 4] = [
        ItemCategory::Total,
        ItemCategory::Shared,
        ItemCategory::Vegetarian,
        ItemCategory::NonVegetarian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Total => "Total",
            ItemCategory::Shared => "Shared",
            ItemCategory::Vegetarian => "Vegetarian",
            ItemCategory::NonVegetarian => "Non-Vegetarian",
        }
    }

    /// Parse a free-text category label
    ///
    /// Matching ignores case, surrounding quotes and trailing punctuation, and
    /// treats spaces, hyphens and underscores alike.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '`')
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "total" => Some(ItemCategory::Total),
            "shared" => Some(ItemCategory::Shared),
            "vegetarian" | "veg" | "veggie" => Some(ItemCategory::Vegetarian),
            "nonvegetarian" | "nonveg" | "nonveggie" => Some(ItemCategory::NonVegetarian),
            _ => None,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    /// Unique identifier
    #[serde(default)]
    pub id: ItemId,

    /// Display name
    pub name: String,

    /// Non-negative amount
    pub amount: Money,

    /// Who pays for this item
    #[serde(default)]
    pub category: ItemCategory,
}

impl ExpenseItem {
    /// Create a new item with a fresh id
    pub fn new(name: impl Into<String>, amount: Money, category: ItemCategory) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            amount,
            category,
        }
    }

    /// A blank manual-entry row
    pub fn blank() -> Self {
        Self::new(String::new(), Money::zero(), ItemCategory::Total)
    }
}

impl fmt::Display for ExpenseItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.amount, self.category)
    }
}

/// A priced line found in receipt text, before categorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub name: String,
    pub amount: Money,
    /// The trimmed line the item was read from
    pub raw_text: String,
}

impl ExtractedItem {
    /// Convert into an expense item with the given category
    pub fn into_expense(self, category: ItemCategory) -> ExpenseItem {
        ExpenseItem::new(self.name, self.amount, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(
            ItemCategory::from_label("Vegetarian"),
            Some(ItemCategory::Vegetarian)
        );
        assert_eq!(
            ItemCategory::from_label(" non-vegetarian."),
            Some(ItemCategory::NonVegetarian)
        );
        assert_eq!(
            ItemCategory::from_label("Non Vegetarian"),
            Some(ItemCategory::NonVegetarian)
        );
        assert_eq!(
            ItemCategory::from_label("\"Shared\""),
            Some(ItemCategory::Shared)
        );
        assert_eq!(ItemCategory::from_label("Vegan-ish"), None);
        assert_eq!(ItemCategory::from_label(""), None);
    }

    #[test]
    fn test_category_round_trips_through_label() {
        for category in ItemCategory::ALL {
            assert_eq!(ItemCategory::from_label(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&ItemCategory::NonVegetarian).unwrap();
        assert_eq!(json, "\"Non-Vegetarian\"");
    }

    #[test]
    fn test_blank_item_defaults_to_total() {
        let item = ExpenseItem::blank();
        assert_eq!(item.category, ItemCategory::Total);
        assert!(item.amount.is_zero());
        assert!(item.name.is_empty());
    }

    #[test]
    fn test_deserialize_without_id() {
        let item: ExpenseItem =
            serde_json::from_str(r#"{"name":"Naan","amount":350,"category":"Vegetarian"}"#)
                .unwrap();
        assert_eq!(item.name, "Naan");
        assert_eq!(item.amount.cents(), 350);
        assert_eq!(item.category, ItemCategory::Vegetarian);
    }
}
