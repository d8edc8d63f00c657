//! vegsplit - Fair bill splitting between vegetarians and non-vegetarians
//!
//! This library splits a shared bill so that vegetarians don't pay for meat.
//! Items are entered by hand or pulled from receipt text, tagged as shared,
//! vegetarian-only or non-vegetarian-only, and the per-person charge for each
//! dietary group is computed from the category totals.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, items, totals, split results)
//! - `services`: Extraction, classification, aggregation and split logic
//! - `display`: Plain-text formatting for terminal output
//! - `cli`: Command handlers for the `vegsplit` binary
//!
//! # Example
//!
//! ```rust
//! use vegsplit::models::Money;
//! use vegsplit::quick_split;
//!
//! let result = quick_split(Money::from_cents(6_000), Money::from_cents(3_000), 3, 1);
//! assert!(result.is_valid());
//! assert!((result.non_vegetarian_charge - 25.0).abs() < 1e-9);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;

pub use error::{VegsplitError, VegsplitResult};
pub use services::{
    aggregate, classify_items, compute_split, extract_line_items, quick_split, BillSession,
    ReceiptScanner,
};
