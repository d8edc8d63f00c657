//! Custom error types for vegsplit
//!
//! This module defines the crate-level error type using thiserror. Most of the
//! core never returns it: split validation failures travel inside
//! [`SplitResult`](crate::models::SplitResult) and classification failures are
//! absorbed by the adapter. What remains here is configuration, I/O, entry
//! surface and OCR failures, plus [`VegsplitError::Split`] for callers that
//! have to stop on an invalid split.

use thiserror::Error;

use crate::models::money::MoneyParseError;
use crate::models::SplitValidationError;

/// The main error type for vegsplit operations
#[derive(Error, Debug)]
pub enum VegsplitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid user input (amount tokens, item files)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The bill cannot be split with the given participant counts
    #[error("Cannot split bill: {0}")]
    Split(SplitValidationError),

    /// The OCR collaborator could not turn the image into text
    #[error("Failed to process the image: {0}")]
    Recognition(String),
}

impl VegsplitError {
    /// Create a "not found" error for expense items
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense item",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for VegsplitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VegsplitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<MoneyParseError> for VegsplitError {
    fn from(err: MoneyParseError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<SplitValidationError> for VegsplitError {
    fn from(err: SplitValidationError) -> Self {
        Self::Split(err)
    }
}

/// Result type alias for vegsplit operations
pub type VegsplitResult<T> = Result<T, VegsplitError>;
