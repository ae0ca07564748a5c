//! Receipt parser bundling the four field extractors.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::receipt::{ExtractionResult, Field, Vendor};

use super::observer::{ExtractionEvent, ExtractionObserver, TracingObserver};
use super::rules::{
    AmountExtractor, DateExtractor, FieldExtractor, FieldMatch, ReferenceExtractor,
    TextView, TextViews, TransactionTypeExtractor, VendorClassifier,
};
use super::ReceiptExtractor;

/// Which rule produced a field, and from what text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTrace {
    pub field: Field,
    pub rule: &'static str,
    pub source: String,
}

impl FieldTrace {
    fn from_match<T>(field: Field, m: &FieldMatch<T>) -> Self {
        Self {
            field,
            rule: m.rule,
            source: m.source.clone(),
        }
    }
}

/// Result of parsing one receipt.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedReceipt {
    /// Extracted fields.
    pub fields: ExtractionResult,
    /// Vendor selected for reference extraction.
    pub vendor: Vendor,
    /// Rule traces for the fields that were found.
    pub matches: Vec<FieldTrace>,
    /// One entry per field that could not be extracted.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Wall-clock timer. `std::time::Instant` is unavailable in browsers, where
/// the processing time is reported as zero.
struct Timer {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl Timer {
    fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.start.elapsed().as_millis() as u64
        }
        #[cfg(target_arch = "wasm32")]
        {
            0
        }
    }
}

/// Rule-based receipt parser.
#[derive(Clone)]
pub struct ReceiptParser {
    observer: Arc<dyn ExtractionObserver>,
    classifier: VendorClassifier,
    reference: ReferenceExtractor,
    date: DateExtractor,
    amount: AmountExtractor,
    transaction_type: TransactionTypeExtractor,
}

impl ReceiptParser {
    /// Create a parser that reports diagnostics through `tracing`.
    pub fn new() -> Self {
        Self {
            observer: Arc::new(TracingObserver::new()),
            classifier: VendorClassifier::new(),
            reference: ReferenceExtractor::new(),
            date: DateExtractor::new(),
            amount: AmountExtractor::new(),
            transaction_type: TransactionTypeExtractor::new(),
        }
    }

    /// Create a parser from extraction settings.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_observer(Arc::new(
                TracingObserver::new().with_text_logging(config.log_text),
            ))
            .with_type_window(config.type_window)
    }

    /// Replace the diagnostic observer.
    pub fn with_observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the transaction type label window.
    pub fn with_type_window(mut self, window: usize) -> Self {
        self.transaction_type = self.transaction_type.with_window(window);
        self
    }

    /// Parse recognized text into receipt fields.
    pub fn parse(&self, text: &str) -> ParsedReceipt {
        let timer = Timer::start();
        let observer = self.observer.as_ref();
        let views = TextViews::new(text);

        info!("Parsing receipt from {} characters of text", text.len());

        for view in [TextView::Normalized, TextView::Corrected] {
            observer.observe(&ExtractionEvent::TextPrepared {
                view,
                text: views.get(view),
            });
        }

        let mut matches = Vec::new();

        let vendor = self.classifier.classify(&views, observer);
        let reference = self.reference.extract_for_vendor(vendor, &views, observer);
        if let Some(m) = &reference {
            matches.push(FieldTrace::from_match(Field::ReferenceId, m));
        }

        let date = self.date.extract(&views, observer);
        if let Some(m) = &date {
            matches.push(FieldTrace::from_match(Field::Date, m));
        }

        let amount = self.amount.extract(&views, observer);
        if let Some(m) = &amount {
            matches.push(FieldTrace::from_match(Field::Amount, m));
        }

        let transaction_type = self.transaction_type.extract(&views, observer);
        if let Some(m) = &transaction_type {
            matches.push(FieldTrace::from_match(Field::TransactionType, m));
        }

        let fields = ExtractionResult {
            reference_id: reference.map(|m| m.value),
            date: date.map(|m| m.value),
            amount: amount.map(|m| m.value),
            transaction_type: transaction_type.map(|m| m.value),
        };

        let warnings = fields
            .missing_fields()
            .iter()
            .map(|f| format!("could not extract {}", f))
            .collect::<Vec<_>>();

        debug!(
            "Extracted receipt fields for vendor {} with {} missing",
            vendor,
            warnings.len()
        );

        ParsedReceipt {
            fields,
            vendor,
            matches,
            warnings,
            processing_time_ms: timer.elapsed_ms(),
        }
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for ReceiptParser {
    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.parse(text).fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::observer::{NullObserver, RecordingObserver};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn parser() -> ReceiptParser {
        ReceiptParser::new().with_observer(Arc::new(NullObserver))
    }

    #[test]
    fn test_scenario_bank_at_am() {
        let text = "BANK@AM\nFund Transfer\nReference No. AB12345\n15 Oct 2024 05:03 pm\nRM 123.45";
        let parsed = parser().parse(text);

        assert_eq!(parsed.vendor, Vendor::BankAtAm);
        assert_eq!(
            parsed.fields,
            ExtractionResult {
                reference_id: Some("AB12345".to_string()),
                date: NaiveDate::from_ymd_opt(2024, 10, 15),
                amount: Some("123.45".to_string()),
                transaction_type: Some("Transfer".to_string()),
            }
        );
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.matches.len(), 4);
    }

    #[test]
    fn test_scenario_cimb_octo() {
        let text = "CIMB OCTO\nDuitNow Reference No.\n123456789 87654321";
        let fields = parser().extract_from_text(text);
        assert_eq!(fields.reference_id.as_deref(), Some("87654321"));
    }

    #[test]
    fn test_scenario_corrected_octo_marker() {
        let text = "0CT0 Receipt DuitNow Reference No. 123456789 87654321";
        let parsed = parser().parse(text);
        assert_eq!(parsed.vendor, Vendor::CimbOcto);
        assert_eq!(parsed.fields.reference_id.as_deref(), Some("87654321"));
    }

    #[test]
    fn test_scenario_date() {
        let fields = parser().extract_from_text("Paid 15 Oct 2024 05:03 pm");
        assert_eq!(fields.date_string().as_deref(), Some("2024-10-15"));
    }

    #[test]
    fn test_scenario_amount() {
        let fields = parser().extract_from_text("Total RM 123.45");
        assert_eq!(fields.amount.as_deref(), Some("123.45"));
    }

    #[test]
    fn test_scenario_nothing_recognizable() {
        let parsed = parser().parse("thank you, come again");
        assert_eq!(parsed.vendor, Vendor::Unknown);
        assert!(parsed.fields.is_empty());
        assert_eq!(parsed.warnings.len(), 4);
        assert!(parsed.matches.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let parsed = parser().parse("");
        assert!(parsed.fields.is_empty());
    }

    #[test]
    fn test_fields_are_independent() {
        // Reference rules fail for the recognized vendor, the others still run.
        let fields = parser().extract_from_text("Maybank\nRM 9.99\n1/12/2024");
        assert_eq!(fields.reference_id, None);
        assert_eq!(fields.amount.as_deref(), Some("9.99"));
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 12, 1));
    }

    #[test]
    fn test_raw_and_normalized_text_agree() {
        let raw = "Touch 'n Go\neWallet\n\n20241015TNGDMYNB0101QR\r\nTransaction No.\n123456789";
        let normalized = crate::receipt::rules::normalize_whitespace(raw);
        assert_eq!(
            parser().extract_from_text(raw).reference_id,
            parser().extract_from_text(&normalized).reference_id
        );
    }

    #[test]
    fn test_observer_sees_every_field() {
        let observer = Arc::new(RecordingObserver::new());
        let parser = ReceiptParser::new().with_observer(observer.clone());
        parser.parse("PUBLIC BANK DuitNow QR Ref No. 11223344");

        let events = observer.events();
        assert!(events.contains(&"vendor public_bank".to_string()));
        assert!(events.contains(&"reference_id <- public_bank.duitnow_qr_ref_no: 11223344".to_string()));
        assert!(events.contains(&"date missed".to_string()));
        assert!(events.contains(&"amount missed".to_string()));
        assert!(events.iter().any(|e| e.starts_with("transaction_type <- ")));
    }

    #[test]
    fn test_shared_parser_across_threads() {
        let parser = &parser();
        let texts = ["Total RM 1.00", "Total RM 2.00", "Total RM 3.00"];

        let amounts: Vec<Option<String>> = std::thread::scope(|s| {
            let handles: Vec<_> = texts
                .iter()
                .map(|&text| s.spawn(move || parser.parse(text).fields.amount))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(
            amounts,
            vec![
                Some("1.00".to_string()),
                Some("2.00".to_string()),
                Some("3.00".to_string())
            ]
        );
    }

    #[test]
    fn test_observer_does_not_change_results() {
        let text = "HLB\n20241015HLBBMYKLO 010QR12345678\nRM 5.00";
        let quiet = parser().parse(text).fields;
        let loud = ReceiptParser::new()
            .with_observer(Arc::new(RecordingObserver::new()))
            .parse(text)
            .fields;
        assert_eq!(quiet, loud);
    }
}
