//! WASM bindings for payment receipt field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Recognition happens elsewhere; these functions take the recognized text (or
//! the OCR.space response body) and return the extracted fields.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use resit_core::models::receipt::{ExtractionResult, Vendor};
use resit_core::ocr::OcrSpaceResponse;
use resit_core::receipt::observer::{ExtractionEvent, ExtractionObserver, NullObserver};
use resit_core::receipt::{FieldTrace, ReceiptExtractor as _, ReceiptParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract receipt fields from recognized text.
///
/// Returns `{ reference_id, date, amount, transaction_type }`; fields that
/// could not be found are `undefined`.
#[wasm_bindgen]
pub fn extract_receipt_from_text(text: &str) -> Result<JsValue, JsValue> {
    let parser = ReceiptParser::new().with_observer(Arc::new(NullObserver));
    to_js(&parser.extract_from_text(text))
}

/// Extract receipt fields from an OCR.space JSON response body.
#[wasm_bindgen]
pub fn extract_receipt_from_ocr_response(body: &str) -> Result<JsValue, JsValue> {
    let response =
        OcrSpaceResponse::from_json(body).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let parser = ReceiptParser::new().with_observer(Arc::new(NullObserver));
    let fields = parser
        .extract(&response)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&fields)
}

/// Parse a date as printed on a receipt into `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn parse_receipt_date(text: &str) -> Option<String> {
    resit_core::receipt::rules::parse_receipt_date(text)
}

/// Find the transaction amount in receipt text.
#[wasm_bindgen]
pub fn extract_receipt_amount(text: &str) -> Option<String> {
    resit_core::receipt::rules::extract_amount_quiet(text)
}

/// Writes extraction diagnostics to the browser console.
struct ConsoleObserver;

impl ExtractionObserver for ConsoleObserver {
    fn observe(&self, event: &ExtractionEvent<'_>) {
        let line = match event {
            ExtractionEvent::TextPrepared { .. } => return,
            ExtractionEvent::VendorClassified { vendor, marker } => {
                format!("resit: vendor {} ({})", vendor, marker.unwrap_or("no marker"))
            }
            ExtractionEvent::RuleMatched { field, rule, value } => {
                format!("resit: {} <- {} = {}", field, rule, value)
            }
            ExtractionEvent::DateFormatRejected { .. } => return,
            ExtractionEvent::FieldMissed { field } => format!("resit: no match for {}", field),
        };
        web_sys::console::debug_1(&JsValue::from_str(&line));
    }
}

/// Receipt extractor class for browser use.
#[wasm_bindgen]
pub struct ReceiptExtractor {
    parser: ReceiptParser,
}

#[wasm_bindgen]
impl ReceiptExtractor {
    /// Create a new receipt extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: ReceiptParser::new().with_observer(Arc::new(NullObserver)),
        }
    }

    /// Log rule decisions to the browser console.
    #[wasm_bindgen]
    pub fn set_console_logging(&mut self, enabled: bool) {
        let observer: Arc<dyn ExtractionObserver> = if enabled {
            Arc::new(ConsoleObserver)
        } else {
            Arc::new(NullObserver)
        };
        self.parser = self.parser.clone().with_observer(observer);
    }

    /// Set how many characters after "Transaction Type" are skipped.
    #[wasm_bindgen]
    pub fn set_type_window(&mut self, window: usize) {
        self.parser = self.parser.clone().with_type_window(window);
    }

    /// Extract receipt fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract_from_text(text))
    }

    /// Get extraction result with metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let parsed = self.parser.parse(text);

        #[derive(serde::Serialize)]
        struct ExtractResult {
            fields: ExtractionResult,
            vendor: Vendor,
            matches: Vec<FieldTrace>,
            warnings: Vec<String>,
            processing_time_ms: u64,
        }

        let output = ExtractResult {
            fields: parsed.fields,
            vendor: parsed.vendor,
            matches: parsed.matches,
            warnings: parsed.warnings,
            processing_time_ms: parsed.processing_time_ms,
        };

        to_js(&output)
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_parse_receipt_date() {
        assert_eq!(parse_receipt_date("28 Sep 2024, 4:13 PM").as_deref(), Some("2024-09-28"));
        assert_eq!(parse_receipt_date("16/10/2024").as_deref(), Some("2024-10-16"));
        assert_eq!(parse_receipt_date("no date"), None);
    }

    #[wasm_bindgen_test]
    fn test_extract_receipt_amount() {
        assert_eq!(extract_receipt_amount("Total RM 12.30").as_deref(), Some("12.30"));
        assert_eq!(extract_receipt_amount("Thank you"), None);
    }

    #[wasm_bindgen_test]
    fn test_extract_receipt_from_text() {
        let value = extract_receipt_from_text("Reference ID ABC123").unwrap();
        let fields: ExtractionResult = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(fields.reference_id.as_deref(), Some("ABC123"));
        assert_eq!(fields.amount, None);
    }

    #[wasm_bindgen_test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
