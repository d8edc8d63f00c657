//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod scan;
pub mod split;

pub use scan::handle_scan_command;
pub use split::{handle_items_command, handle_quick_command, load_items, GroupArgs};
