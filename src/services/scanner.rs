//! Receipt scanning
//!
//! Ties the OCR port, line extraction and classification together. The scanner
//! never fails after text has been recognized: an empty extraction is reported
//! as [`ScanStatus::NoItemsFound`] and classification problems degrade to
//! `Shared` items.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{VegsplitError, VegsplitResult};
use crate::models::ExpenseItem;

use super::classification::{
    classify_with, CategoryClassifier, Classification, ClassificationService, ClassificationStatus,
};
use super::extraction::LineExtractor;

/// OCR failure, opaque to the rest of the pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RecognitionError(pub String);

/// Port to an OCR engine
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String, RecognitionError>;
}

/// Recognizer for input that is already text, such as an OCR dump
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRecognizer;

#[async_trait]
impl TextRecognizer for PlainTextRecognizer {
    async fn recognize(&self, image: &[u8]) -> Result<String, RecognitionError> {
        String::from_utf8(image.to_vec())
            .map_err(|e| RecognitionError(format!("input is not UTF-8 text: {}", e)))
    }
}

/// How a scan ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    /// Items were found and categorized with the given outcome
    Extracted(ClassificationStatus),
    /// The text contained no priced lines
    NoItemsFound,
}

/// Result of scanning one receipt
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub raw_text: String,
    pub items: Vec<ExpenseItem>,
    pub status: ScanStatus,
}

impl ScanOutcome {
    /// A user-facing hint, if the user should act on the outcome
    pub fn hint(&self) -> Option<String> {
        match &self.status {
            ScanStatus::NoItemsFound => Some(
                "No items with prices were found. Enter items manually".to_string(),
            ),
            ScanStatus::Extracted(status) => status.hint(),
        }
    }
}

/// Turns receipt images into categorized expense items
#[derive(Debug, Clone, Default)]
pub struct ReceiptScanner {
    extractor: LineExtractor,
    classifier: ClassificationService,
}

impl ReceiptScanner {
    pub fn new(extractor: LineExtractor, classifier: ClassificationService) -> Self {
        Self {
            extractor,
            classifier,
        }
    }

    /// Build a scanner from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            LineExtractor::with_rules(settings.extraction.clone()),
            ClassificationService::new(settings.classifier.clone()),
        )
    }

    /// Scan using the configured remote classifier
    pub async fn scan(
        &self,
        image: &[u8],
        recognizer: &dyn TextRecognizer,
        credential: Option<&str>,
    ) -> VegsplitResult<ScanOutcome> {
        let raw_text = recognize(image, recognizer).await?;
        let extracted = self.extractor.extract(&raw_text);
        if extracted.is_empty() {
            return Ok(no_items(raw_text));
        }

        let classification = self.classifier.classify(extracted, credential).await;
        Ok(outcome(raw_text, classification))
    }

    /// Scan using a caller-supplied classifier
    pub async fn scan_with(
        &self,
        image: &[u8],
        recognizer: &dyn TextRecognizer,
        classifier: &dyn CategoryClassifier,
    ) -> VegsplitResult<ScanOutcome> {
        let raw_text = recognize(image, recognizer).await?;
        let extracted = self.extractor.extract(&raw_text);
        if extracted.is_empty() {
            return Ok(no_items(raw_text));
        }

        let classification = classify_with(extracted, classifier).await;
        Ok(outcome(raw_text, classification))
    }
}

async fn recognize(image: &[u8], recognizer: &dyn TextRecognizer) -> VegsplitResult<String> {
    recognizer.recognize(image).await.map_err(|e| {
        warn!(error = %e, bytes = image.len(), "receipt_recognition_failed");
        VegsplitError::Recognition(e.0)
    })
}

fn no_items(raw_text: String) -> ScanOutcome {
    info!("receipt_no_items_found");
    ScanOutcome {
        raw_text,
        items: Vec::new(),
        status: ScanStatus::NoItemsFound,
    }
}

fn outcome(raw_text: String, classification: Classification) -> ScanOutcome {
    info!(
        items = classification.items.len(),
        resolved = classification.is_resolved(),
        "receipt_scanned"
    );
    ScanOutcome {
        raw_text,
        items: classification.items,
        status: ScanStatus::Extracted(classification.status),
    }
}
