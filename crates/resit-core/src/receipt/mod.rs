//! Receipt field extraction module.

pub mod observer;
mod parser;
pub mod rules;

pub use observer::{ExtractionEvent, ExtractionObserver, NullObserver, RecordingObserver, TracingObserver};
pub use parser::{FieldTrace, ParsedReceipt, ReceiptParser};

use crate::models::receipt::ExtractionResult;
use crate::ocr::OcrSpaceResponse;

/// Result type for extraction operations that cross the recognition boundary.
pub type Result<T> = std::result::Result<T, crate::error::OcrError>;

/// Trait for receipt field extractors.
pub trait ReceiptExtractor {
    /// Extract receipt fields from recognized text. Never fails.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;

    /// Extract receipt fields from an OCR.space response.
    fn extract(&self, response: &OcrSpaceResponse) -> Result<ExtractionResult> {
        let text = response.text()?;
        Ok(self.extract_from_text(text))
    }
}
