//! Transaction type classification.

use crate::models::receipt::Field;
use crate::receipt::observer::{ExtractionEvent, ExtractionObserver, TracingObserver};

use super::normalize::TextViews;
use super::patterns::TRANSACTION_TYPE_LABEL;
use super::{FieldExtractor, FieldMatch};

/// Known type labels, most specific first.
///
/// A generic label must never be tried before a specific label that
/// contains it.
pub const TRANSACTION_TYPES: &[&str] = &[
    "DuitNow QR TNGD",
    "DuitNow QR TNGo",
    "DuitNow QR",
    "QR Payment",
    "Payment",
    "Transfer",
];

/// Default number of characters skipped after the label.
pub const DEFAULT_TYPE_WINDOW: usize = 40;

/// Transaction type extractor.
#[derive(Debug, Clone, Copy)]
pub struct TransactionTypeExtractor {
    window: usize,
}

impl TransactionTypeExtractor {
    pub fn new() -> Self {
        Self {
            window: DEFAULT_TYPE_WINDOW,
        }
    }

    /// Set the label window size.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Token found `window` characters after the first "Transaction Type"
    /// label, read up to the next whitespace.
    ///
    /// When fewer than `window` characters follow the label the token is empty.
    pub fn labelled_token<'t>(&self, text: &'t str) -> Option<&'t str> {
        let label = TRANSACTION_TYPE_LABEL.find(text)?;
        let rest = &text[label.end()..];

        let token = match rest.char_indices().nth(self.window) {
            Some((start, _)) => {
                let tail = &rest[start..];
                let end = tail.find(char::is_whitespace).unwrap_or(tail.len());
                &tail[..end]
            }
            None => "",
        };

        Some(token.trim())
    }

    /// First known label contained in `text`, case-insensitively.
    pub fn match_known(text: &str) -> Option<&'static str> {
        let haystack = text.to_lowercase();
        TRANSACTION_TYPES
            .iter()
            .copied()
            .find(|t| haystack.contains(&t.to_lowercase()))
    }

    /// Classify `text` (already normalized).
    pub fn extract_from(&self, text: &str) -> Option<FieldMatch<String>> {
        if let Some(token) = self.labelled_token(text) {
            if let Some(label) = Self::match_known(token) {
                return Some(FieldMatch::new(label.to_string(), "transaction_type.labelled", token));
            }
        }

        Self::match_known(text)
            .map(|label| FieldMatch::new(label.to_string(), "transaction_type.anywhere", label))
    }
}

impl Default for TransactionTypeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TransactionTypeExtractor {
    type Output = String;

    fn extract(
        &self,
        views: &TextViews<'_>,
        observer: &dyn ExtractionObserver,
    ) -> Option<FieldMatch<String>> {
        let result = self.extract_from(views.normalized());

        match &result {
            Some(m) => observer.observe(&ExtractionEvent::RuleMatched {
                field: Field::TransactionType,
                rule: m.rule,
                value: &m.value,
            }),
            None => observer.observe(&ExtractionEvent::FieldMissed {
                field: Field::TransactionType,
            }),
        }

        result
    }
}

/// Classify the transaction type of raw recognized text.
pub fn extract_transaction_type(text: &str) -> Option<String> {
    let views = TextViews::new(text);
    TransactionTypeExtractor::new()
        .extract(&views, &TracingObserver::new())
        .map(|m| m.value)
}
