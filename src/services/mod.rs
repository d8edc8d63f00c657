//! Service layer for vegsplit
//!
//! The service layer holds the bill pipeline: receipt text is turned into
//! candidate items, candidates are categorized, items are summed by category
//! and the totals are split across participants.

pub mod aggregation;
pub mod classification;
pub mod extraction;
pub mod scanner;
pub mod session;
pub mod split;

pub use aggregation::aggregate;
pub use classification::{
    classify_items, classify_with, CategoryClassifier, Classification, ClassificationService,
    ClassificationStatus, ClassifierError, OpenAiClassifier, UnresolvedReason,
};
pub use extraction::{extract_line_items, ExtractionRules, LineExtractor};
pub use scanner::{
    PlainTextRecognizer, ReceiptScanner, RecognitionError, ScanOutcome, ScanStatus,
    TextRecognizer,
};
pub use session::BillSession;
pub use split::{compute_split, quick_split};
