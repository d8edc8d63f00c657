//! Expense item display formatting
//!
//! Formats the bill's items as a table, declared totals first.

use crate::models::{ExpenseItem, ItemCategory};

/// Format items as a table
///
/// Rows keep the order they are given in; pass
/// [`BillSession::display_order`](crate::services::BillSession::display_order)
/// to get totals listed first.
pub fn format_item_table(items: &[&ExpenseItem], symbol: &str) -> String {
    if items.is_empty() {
        return "No items.".to_string();
    }

    let name_width = items
        .iter()
        .map(|i| i.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let category_width = ItemCategory::ALL
        .iter()
        .map(|c| c.as_str().len())
        .max()
        .unwrap_or(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<category_width$}  {:>10}\n",
        "Item",
        "Category",
        "Amount",
        name_width = name_width,
        category_width = category_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<category_width$}  {:->10}\n",
        "",
        "",
        "",
        name_width = name_width,
        category_width = category_width,
    ));

    for item in items {
        let name = if item.name.trim().is_empty() {
            "(unnamed)"
        } else {
            item.name.as_str()
        };
        output.push_str(&format!(
            "{:<name_width$}  {:<category_width$}  {:>10}\n",
            name,
            item.category.as_str(),
            item.amount.format_with_symbol(symbol),
            name_width = name_width,
            category_width = category_width,
        ));
    }

    output
}
