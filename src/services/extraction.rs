//! Receipt line extraction
//!
//! Turns raw OCR text into candidate priced items. Each non-blank line is
//! scanned for currency amounts; the rightmost one is taken as the line's own
//! price (earlier ones are usually quantities or unit prices) and whatever
//! precedes it becomes the item name.
//!
//! Extraction never fails. Lines that don't look like priced items are simply
//! dropped, and an empty result is left to the caller to report.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::money::currency_pattern;
use crate::models::{ExtractedItem, Money};

/// Thresholds that separate item lines from receipt noise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRules {
    /// Amounts at or above this are treated as totals or misread numbers
    #[serde(default = "default_max_amount")]
    pub max_amount: Money,

    /// Names shorter than this (in characters) are treated as OCR noise
    #[serde(default = "default_min_name_chars")]
    pub min_name_chars: usize,
}

fn default_max_amount() -> Money {
    Money::from_cents(100_000)
}

fn default_min_name_chars() -> usize {
    3
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            max_amount: default_max_amount(),
            min_name_chars: default_min_name_chars(),
        }
    }
}

/// Extracts priced items from receipt text
#[derive(Debug, Clone, Default)]
pub struct LineExtractor {
    rules: ExtractionRules,
}

impl LineExtractor {
    /// Create an extractor with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: ExtractionRules) -> Self {
        Self { rules }
    }

    /// Extract all candidate items, in input order
    pub fn extract(&self, text: &str) -> Vec<ExtractedItem> {
        let mut scanned = 0usize;
        let items: Vec<ExtractedItem> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .inspect(|_| scanned += 1)
            .filter_map(|line| self.extract_line(line))
            .collect();

        debug!(
            lines = scanned,
            items = items.len(),
            "receipt_lines_extracted"
        );
        items
    }

    /// Extract a candidate from a single line, if it is a priced item
    pub fn extract_line(&self, line: &str) -> Option<ExtractedItem> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let price = currency_pattern().find_iter(line).last()?;
        let amount = Money::parse(price.as_str()).ok()?;

        if !amount.is_positive() || amount >= self.rules.max_amount {
            return None;
        }

        let name = clean_item_name(&line[..price.start()]);
        if name.chars().count() < self.rules.min_name_chars {
            return None;
        }

        Some(ExtractedItem {
            name,
            amount,
            raw_text: line.to_string(),
        })
    }
}

/// Extract candidate items with the default thresholds
pub fn extract_line_items(text: &str) -> Vec<ExtractedItem> {
    LineExtractor::new().extract(text)
}

/// Drop leading quantity tokens and collapse whitespace
fn clean_item_name(prefix: &str) -> String {
    prefix
        .split_whitespace()
        .skip_while(|token| token.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ")
}
