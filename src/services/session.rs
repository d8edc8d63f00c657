//! Bill session
//!
//! The single owner of a bill while it is being entered: the item collection
//! and the participant counts. Derived values (totals, split) are recomputed
//! in full on every request.

use crate::error::{VegsplitError, VegsplitResult};
use crate::models::{CategoryTotals, ExpenseItem, ItemCategory, ItemId, Money, SplitResult};

use super::aggregation::aggregate;
use super::split::compute_split;

/// In-memory state of one bill
#[derive(Debug, Clone, Default)]
pub struct BillSession {
    items: Vec<ExpenseItem>,
    people: u32,
    veggies: u32,
}

impl BillSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with participant counts already set
    pub fn with_participants(people: u32, veggies: u32) -> Self {
        Self {
            items: Vec::new(),
            people,
            veggies,
        }
    }

    pub fn items(&self) -> &[ExpenseItem] {
        &self.items
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    pub fn veggies(&self) -> u32 {
        self.veggies
    }

    pub fn set_participants(&mut self, people: u32, veggies: u32) {
        self.people = people;
        self.veggies = veggies;
    }

    /// Append a blank row (category `Total`) and return its id
    pub fn add_item(&mut self) -> ItemId {
        let item = ExpenseItem::blank();
        let id = item.id;
        self.items.push(item);
        id
    }

    /// Append a fully specified item
    pub fn add(&mut self, item: ExpenseItem) -> VegsplitResult<ItemId> {
        check_amount(item.amount)?;
        let id = item.id;
        self.items.push(item);
        Ok(id)
    }

    /// Append items produced by receipt import, preserving their order
    ///
    /// Nothing is appended if any amount is out of range.
    pub fn import_items(
        &mut self,
        items: impl IntoIterator<Item = ExpenseItem>,
    ) -> VegsplitResult<usize> {
        let items: Vec<ExpenseItem> = items.into_iter().collect();
        for item in &items {
            check_amount(item.amount)?;
        }
        let count = items.len();
        self.items.extend(items);
        Ok(count)
    }

    pub fn get(&self, id: ItemId) -> Option<&ExpenseItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: ItemId) -> VegsplitResult<&mut ExpenseItem> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| VegsplitError::item_not_found(id.to_string()))
    }

    pub fn update_name(&mut self, id: ItemId, name: impl Into<String>) -> VegsplitResult<()> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn update_amount(&mut self, id: ItemId, amount: Money) -> VegsplitResult<()> {
        check_amount(amount)?;
        self.get_mut(id)?.amount = amount;
        Ok(())
    }

    pub fn update_category(&mut self, id: ItemId, category: ItemCategory) -> VegsplitResult<()> {
        self.get_mut(id)?.category = category;
        Ok(())
    }

    /// Remove an item, returning it
    pub fn remove(&mut self, id: ItemId) -> VegsplitResult<ExpenseItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| VegsplitError::item_not_found(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Items with `Total` rows first, otherwise in entry order
    pub fn display_order(&self) -> Vec<&ExpenseItem> {
        let mut items: Vec<&ExpenseItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.category != ItemCategory::Total);
        items
    }

    pub fn totals(&self) -> CategoryTotals {
        aggregate(&self.items)
    }

    pub fn split(&self) -> SplitResult {
        compute_split(&self.totals(), self.people, self.veggies)
    }
}

/// Amounts must be non-negative and at most [`Money::MAX_INPUT`], so category
/// sums stay within `i64`
fn check_amount(amount: Money) -> VegsplitResult<()> {
    if amount.is_negative() {
        return Err(VegsplitError::InvalidInput(format!(
            "Amount cannot be negative: {}",
            amount
        )));
    }
    if amount > Money::MAX_INPUT {
        return Err(VegsplitError::InvalidInput(format!(
            "Amount exceeds the maximum of {}: {}",
            Money::MAX_INPUT,
            amount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SplitValidationError;

    fn money(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn test_manual_entry_flow() {
        let mut session = BillSession::with_participants(3, 1);

        let total = session.add_item();
        session.update_name(total, "Dinner").unwrap();
        session.update_amount(total, money(6_000)).unwrap();

        let meat = session.add_item();
        session.update_name(meat, "Chicken Wings").unwrap();
        session.update_amount(meat, money(3_000)).unwrap();
        session
            .update_category(meat, ItemCategory::NonVegetarian)
            .unwrap();

        let totals = session.totals();
        assert_eq!(totals.total, money(6_000));
        assert_eq!(totals.non_vegetarian, money(3_000));
        assert_eq!(totals.remaining_amount(), money(3_000));

        let split = session.split();
        assert!(split.is_valid());
        assert!((split.vegetarian_charge - 10.0).abs() < 1e-9);
        assert!((split.non_vegetarian_charge - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_recomputes_after_participant_change() {
        let mut session = BillSession::with_participants(2, 1);
        session
            .add(ExpenseItem::new("Ribs", money(2_000), ItemCategory::NonVegetarian))
            .unwrap();
        assert!(session.split().is_valid());

        session.set_participants(2, 2);
        assert_eq!(
            session.split().error,
            Some(SplitValidationError::NoNonVegetarians)
        );
    }

    #[test]
    fn test_remove_item() {
        let mut session = BillSession::new();
        let keep = session
            .add(ExpenseItem::new("Dal", money(900), ItemCategory::Vegetarian))
            .unwrap();
        let drop = session
            .add(ExpenseItem::new("Fish", money(1_500), ItemCategory::NonVegetarian))
            .unwrap();

        let removed = session.remove(drop).unwrap();
        assert_eq!(removed.name, "Fish");
        assert_eq!(session.items().len(), 1);
        assert!(session.get(keep).is_some());
        assert!(session.totals().non_vegetarian.is_zero());
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut session = BillSession::new();
        let stranger = ItemId::new();

        assert!(session.remove(stranger).unwrap_err().is_not_found());
        assert!(session.update_name(stranger, "x").unwrap_err().is_not_found());
        assert!(session
            .update_category(stranger, ItemCategory::Shared)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut session = BillSession::new();
        let id = session.add_item();
        let err = session.update_amount(id, money(-100)).unwrap_err();
        assert!(matches!(err, VegsplitError::InvalidInput(_)));
        assert!(session.get(id).unwrap().amount.is_zero());
    }

    #[test]
    fn test_display_order_puts_totals_first() {
        let mut session = BillSession::new();
        session.add(ExpenseItem::new("Naan", money(300), ItemCategory::Vegetarian)).unwrap();
        session.add(ExpenseItem::new("Receipt", money(5_000), ItemCategory::Total)).unwrap();
        session.add(ExpenseItem::new("Lassi", money(400), ItemCategory::Shared)).unwrap();
        session.add(ExpenseItem::new("Tip", money(700), ItemCategory::Total)).unwrap();

        let names: Vec<&str> = session
            .display_order()
            .iter()
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(names, vec!["Receipt", "Tip", "Naan", "Lassi"]);

        // Entry order itself is untouched
        assert_eq!(session.items()[0].name, "Naan");
    }

    #[test]
    fn test_import_appends_in_order() {
        let mut session = BillSession::new();
        session.add_item();
        let imported = session
            .import_items(vec![
                ExpenseItem::new("Samosa", money(450), ItemCategory::Shared),
                ExpenseItem::new("Kebab", money(1_200), ItemCategory::Shared),
            ])
            .unwrap();

        assert_eq!(imported, 2);
        assert_eq!(session.items()[1].name, "Samosa");
        assert_eq!(session.items()[2].name, "Kebab");
    }

    #[test]
    fn test_amount_ceiling_keeps_totals_in_range() {
        let mut session = BillSession::with_participants(2, 0);
        let id = session.add_item();

        let huge = money(90_000_000_000_000_000);
        let err = session.update_amount(id, huge).unwrap_err();
        assert!(matches!(err, VegsplitError::InvalidInput(_)));

        let err = session
            .add(ExpenseItem::new("Yacht", huge, ItemCategory::Shared))
            .unwrap_err();
        assert!(matches!(err, VegsplitError::InvalidInput(_)));

        let err = session
            .import_items(vec![
                ExpenseItem::new("Tea", money(200), ItemCategory::Shared),
                ExpenseItem::new("Yacht", huge, ItemCategory::Shared),
            ])
            .unwrap_err();
        assert!(matches!(err, VegsplitError::InvalidInput(_)));
        assert_eq!(session.items().len(), 1);

        session.update_amount(id, Money::MAX_INPUT).unwrap();
        session
            .add(ExpenseItem::new("Also big", Money::MAX_INPUT, ItemCategory::Shared))
            .unwrap();
        assert_eq!(session.totals().shared.cents(), 2 * Money::MAX_INPUT.cents());
    }
}
