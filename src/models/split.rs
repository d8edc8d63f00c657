//! Split outcome types
//!
//! A [`SplitResult`] is a projection of the current bill: either per-person
//! charges, or the first validation rule the inputs broke. Amounts are plain
//! `f64` currency units and are not rounded; rounding is a display concern.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::Money;

/// Why a bill cannot be split with the given participant counts
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitValidationError {
    #[error("Total people must be greater than 0")]
    NoParticipants,

    #[error("Vegetarians cannot exceed total people")]
    TooManyVegetarians,

    /// Only produced by the quick total/meat split
    #[error("Meat expenses cannot exceed total expenses")]
    MeatExceedsTotal,

    #[error("Cannot split non-vegetarian expenses — all participants are vegetarian")]
    NoNonVegetarians,

    #[error("Cannot split vegetarian expenses — no vegetarians in the group")]
    NoVegetarians,
}

/// Non-blocking remarks about an otherwise valid split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitWarning {
    /// Itemized entries exceed the declared total by `excess`; the negative
    /// remainder still reduces the shared pool
    OverItemized { excess: Money },
}

impl std::fmt::Display for SplitWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitWarning::OverItemized { excess } => write!(
                f,
                "Itemized entries exceed the declared total by {}",
                excess
            ),
        }
    }
}

/// Per-person charges for a bill
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SplitResult {
    /// Everyone's share of the shared pool
    pub shared_per_person: f64,
    /// Each vegetarian's share of vegetarian-only items
    pub vegetarian_only_per_person: f64,
    /// Each non-vegetarian's share of non-vegetarian-only items
    pub non_vegetarian_only_per_person: f64,
    /// What each vegetarian pays
    pub vegetarian_charge: f64,
    /// What each non-vegetarian pays
    pub non_vegetarian_charge: f64,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SplitValidationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<SplitWarning>,
}

impl SplitResult {
    /// An invalid result: all amounts zero, carrying the failed rule
    pub fn invalid(error: SplitValidationError) -> Self {
        Self {
            valid: false,
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// View the result as a `Result`, for callers that prefer `?`
    pub fn ok(&self) -> Result<&Self, SplitValidationError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
