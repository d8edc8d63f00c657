//! Split CLI commands
//!
//! Implements the quick total/meat split and the itemized split read from a
//! JSON item file.

use std::path::Path;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::display::{format_currency, format_item_table, format_split_summary, format_totals};
use crate::error::{VegsplitError, VegsplitResult};
use crate::models::{CategoryTotals, ExpenseItem, ItemCategory, Money, MoneyParseError, SplitResult};
use crate::services::{quick_split, BillSession};

/// Who is sharing the bill
#[derive(Args, Debug, Clone, Copy)]
pub struct GroupArgs {
    /// Total number of people
    #[arg(short, long)]
    pub people: u32,

    /// How many of them are vegetarian
    #[arg(short, long, default_value_t = 0)]
    pub veggies: u32,
}

/// Handle `vegsplit quick`
pub fn handle_quick_command(
    settings: &Settings,
    total: Money,
    meat: Money,
    group: GroupArgs,
    json: bool,
) -> VegsplitResult<()> {
    let result = quick_split(total, meat, group.people, group.veggies);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.is_valid() {
        let symbol = &settings.currency_symbol;
        println!(
            "Total: {}  Meat: {}",
            total.format_with_symbol(symbol),
            meat.format_with_symbol(symbol)
        );
        print!(
            "{}",
            format_split_summary(&result, group.people, group.veggies, symbol)
        );
    }

    result.ok()?;
    Ok(())
}

/// Handle `vegsplit items`
pub async fn handle_items_command(
    settings: &Settings,
    file: &Path,
    group: GroupArgs,
    json: bool,
) -> VegsplitResult<()> {
    let items = load_items(file).await?;

    let mut session = BillSession::with_participants(group.people, group.veggies);
    session.import_items(items)?;

    report_bill(&session, settings, json, None)
}

/// An amount in an item file, either a number or a currency string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn to_money(&self) -> Result<Money, MoneyParseError> {
        match self {
            AmountInput::Number(value) => Money::try_from_f64(*value),
            AmountInput::Text(text) => Money::parse(text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItemInput {
    #[serde(default)]
    name: String,
    amount: AmountInput,
    #[serde(default)]
    category: Option<String>,
}

impl ItemInput {
    fn into_item(self) -> VegsplitResult<ExpenseItem> {
        let amount = self.amount.to_money().map_err(|e| {
            VegsplitError::InvalidInput(format!("item '{}': {}", self.name, e))
        })?;

        let category = match self.category.as_deref() {
            None => ItemCategory::Total,
            Some(label) => ItemCategory::from_label(label).ok_or_else(|| {
                VegsplitError::InvalidInput(format!(
                    "item '{}': unknown category '{}'",
                    self.name, label
                ))
            })?,
        };

        Ok(ExpenseItem::new(self.name, amount, category))
    }
}

/// Read a JSON array of `{name, amount, category}` objects
///
/// A missing category makes the row a declared total, like a freshly added
/// row in an interactive session.
pub async fn load_items(path: &Path) -> VegsplitResult<Vec<ExpenseItem>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| VegsplitError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let inputs: Vec<ItemInput> = serde_json::from_str(&contents)?;
    inputs.into_iter().map(ItemInput::into_item).collect()
}

#[derive(Serialize)]
struct BillReport<'a> {
    items: Vec<&'a ExpenseItem>,
    totals: CategoryTotals,
    split: SplitResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

/// Print the items, totals and split of a session
///
/// Fails with [`VegsplitError::Split`] after printing when the split is
/// invalid, so the process exits non-zero.
pub(crate) fn report_bill(
    session: &BillSession,
    settings: &Settings,
    json: bool,
    hint: Option<String>,
) -> VegsplitResult<()> {
    let totals = session.totals();
    let split = session.split();

    if json {
        let report = BillReport {
            items: session.display_order(),
            totals,
            split,
            hint,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let symbol = &settings.currency_symbol;
        print!("{}", format_item_table(&session.display_order(), symbol));
        println!();
        print!("{}", format_totals(&totals, symbol));
        println!();
        if split.is_valid() {
            print!(
                "{}",
                format_split_summary(&split, session.people(), session.veggies(), symbol)
            );
            let collected = f64::from(session.veggies()) * split.vegetarian_charge
                + f64::from(session.people() - session.veggies()) * split.non_vegetarian_charge;
            println!("  Collected in total:             {:>10}", format_currency(collected, symbol));
        }
        if let Some(hint) = hint {
            println!();
            println!("Note: {}", hint);
        }
    }

    split.ok()?;
    Ok(())
}
