//! Display formatting for terminal output
//!
//! Provides utilities for formatting items, totals and split results for
//! terminal display. Split amounts are kept unrounded everywhere else; this is
//! the only place they are rounded to cents.

pub mod item;
pub mod split;

pub use item::format_item_table;
pub use split::{format_split_summary, format_totals};

/// Format a dollar amount with two decimals, e.g. `$12.50` or `-$2.50`
pub fn format_currency(value: f64, symbol: &str) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded < 0.0 {
        format!("-{}{:.2}", symbol, rounded.abs())
    } else {
        // Also folds -0.0 into 0.00
        format!("{}{:.2}", symbol, rounded.abs())
    }
}
