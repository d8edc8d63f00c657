//! Receipt scan CLI command
//!
//! Reads receipt text produced by an OCR tool, extracts and categorizes the
//! priced lines, and splits the resulting bill.

use std::path::Path;

use crate::config::Settings;
use crate::error::{VegsplitError, VegsplitResult};
use crate::services::{BillSession, PlainTextRecognizer, ReceiptScanner};

use super::split::{report_bill, GroupArgs};

/// Handle `vegsplit scan`
pub async fn handle_scan_command(
    settings: &Settings,
    file: &Path,
    group: GroupArgs,
    api_key: Option<&str>,
    json: bool,
) -> VegsplitResult<()> {
    let bytes = tokio::fs::read(file)
        .await
        .map_err(|e| VegsplitError::Io(format!("Failed to read {}: {}", file.display(), e)))?;

    let scanner = ReceiptScanner::from_settings(settings);
    let outcome = scanner.scan(&bytes, &PlainTextRecognizer, api_key).await?;
    let hint = outcome.hint();

    let mut session = BillSession::with_participants(group.people, group.veggies);
    session.import_items(outcome.items)?;

    report_bill(&session, settings, json, hint)
}
