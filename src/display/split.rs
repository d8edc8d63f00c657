//! Totals and split display formatting

use crate::models::{CategoryTotals, SplitResult};

use super::format_currency;

/// Format the category breakdown of a bill
pub fn format_totals(totals: &CategoryTotals, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Bill Breakdown\n");
    output.push_str(&format!(
        "  Declared total:       {:>12}\n",
        totals.total.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Shared items:         {:>12}\n",
        totals.shared.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Vegetarian items:     {:>12}\n",
        totals.vegetarian.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Non-vegetarian items: {:>12}\n",
        totals.non_vegetarian.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Not itemized:         {:>12}\n",
        totals.remaining_amount().format_with_symbol(symbol)
    ));

    output
}

/// Format what each dietary group pays
pub fn format_split_summary(result: &SplitResult, people: u32, veggies: u32, symbol: &str) -> String {
    if let Some(err) = result.error {
        return format!("Cannot split bill: {}\n", err);
    }

    let non_vegetarians = people.saturating_sub(veggies);
    let mut output = String::new();

    output.push_str(&format!(
        "Split for {} people ({} vegetarian, {} non-vegetarian)\n",
        people, veggies, non_vegetarians
    ));
    output.push_str(&format!(
        "  Shared per person:              {:>10}\n",
        format_currency(result.shared_per_person, symbol)
    ));
    if veggies > 0 {
        output.push_str(&format!(
            "  Vegetarian-only per vegetarian: {:>10}\n",
            format_currency(result.vegetarian_only_per_person, symbol)
        ));
    }
    if non_vegetarians > 0 {
        output.push_str(&format!(
            "  Meat per non-vegetarian:        {:>10}\n",
            format_currency(result.non_vegetarian_only_per_person, symbol)
        ));
    }

    output.push('\n');
    if veggies > 0 {
        output.push_str(&format!(
            "  Each vegetarian pays:           {:>10}\n",
            format_currency(result.vegetarian_charge, symbol)
        ));
    }
    if non_vegetarians > 0 {
        output.push_str(&format!(
            "  Each non-vegetarian pays:       {:>10}\n",
            format_currency(result.non_vegetarian_charge, symbol)
        ));
    }

    if let Some(warning) = result.warning {
        output.push_str(&format!("\nWarning: {}\n", warning));
    }

    output
}
