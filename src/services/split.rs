//! Split calculation
//!
//! Allocates a bill across participants: the shared pool (shared items plus
//! anything on the declared total that was not itemized) is divided by
//! everyone, vegetarian-only items by vegetarians and non-vegetarian-only
//! items by non-vegetarians.
//!
//! Validation runs before any arithmetic and the first failing rule is
//! reported. Amounts are not rounded here.

use tracing::warn;

use crate::models::{CategoryTotals, Money, SplitResult, SplitValidationError, SplitWarning};

/// Compute per-person charges from category totals
pub fn compute_split(totals: &CategoryTotals, people: u32, veggies: u32) -> SplitResult {
    if let Err(err) = validate(totals, people, veggies) {
        return SplitResult::invalid(err);
    }

    let non_vegetarians = people - veggies;

    let shared_per_person = totals.effective_shared().as_f64() / f64::from(people);
    let vegetarian_only_per_person = if veggies > 0 {
        totals.vegetarian.as_f64() / f64::from(veggies)
    } else {
        0.0
    };
    let non_vegetarian_only_per_person = if non_vegetarians > 0 {
        totals.non_vegetarian.as_f64() / f64::from(non_vegetarians)
    } else {
        0.0
    };

    let warning = if totals.is_over_itemized() {
        let excess = -totals.remaining_amount();
        warn!(
            excess_cents = excess.cents(),
            shared_per_person, "split_over_itemized"
        );
        Some(SplitWarning::OverItemized { excess })
    } else {
        None
    };

    SplitResult {
        shared_per_person,
        vegetarian_only_per_person,
        non_vegetarian_only_per_person,
        vegetarian_charge: shared_per_person + vegetarian_only_per_person,
        non_vegetarian_charge: shared_per_person + non_vegetarian_only_per_person,
        valid: true,
        error: None,
        warning,
    }
}

fn validate(totals: &CategoryTotals, people: u32, veggies: u32) -> Result<(), SplitValidationError> {
    if people == 0 {
        return Err(SplitValidationError::NoParticipants);
    }
    if veggies > people {
        return Err(SplitValidationError::TooManyVegetarians);
    }
    if totals.non_vegetarian.is_positive() && people - veggies == 0 {
        return Err(SplitValidationError::NoNonVegetarians);
    }
    if totals.vegetarian.is_positive() && veggies == 0 {
        return Err(SplitValidationError::NoVegetarians);
    }
    Ok(())
}

/// Split a bill given only its total and the meat portion
///
/// Everything that isn't meat is shared by everyone; meat is shared by
/// non-vegetarians.
pub fn quick_split(total: Money, meat: Money, people: u32, veggies: u32) -> SplitResult {
    if people == 0 {
        return SplitResult::invalid(SplitValidationError::NoParticipants);
    }
    if veggies > people {
        return SplitResult::invalid(SplitValidationError::TooManyVegetarians);
    }
    if meat > total {
        return SplitResult::invalid(SplitValidationError::MeatExceedsTotal);
    }

    let totals = CategoryTotals {
        total,
        non_vegetarian: meat,
        ..CategoryTotals::default()
    };
    compute_split(&totals, people, veggies)
}
