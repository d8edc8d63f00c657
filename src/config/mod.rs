//! Configuration module for vegsplit
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::VegsplitPaths;
pub use settings::{ClassifierSettings, Settings};
