//! Rule-based field extractors for payment receipts.

pub mod normalize;
pub mod vendor;
pub mod reference;
pub mod dates;
pub mod amounts;
pub mod txn_type;
pub mod patterns;

pub use normalize::{normalize_whitespace, apply_confusions, TextView, TextViews};
pub use vendor::{classify_vendor, VendorClassifier, VendorMarker, VENDOR_MARKERS};
pub use reference::{
    extract_reference, rule_set, Assembly, Piece, ReferenceExtractor, ReferenceRule, RuleSet,
};
pub use dates::{
    extract_date, parse_date_candidate, parse_receipt_date, DateExtractor, DateFormat, DATE_FORMATS,
};
pub use amounts::{extract_amount, extract_amount_quiet, AmountExtractor};
pub use txn_type::{
    extract_transaction_type, TransactionTypeExtractor, DEFAULT_TYPE_WINDOW, TRANSACTION_TYPES,
};

use super::observer::ExtractionObserver;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field, reporting what was tried to `observer`.
    fn extract(
        &self,
        views: &TextViews<'_>,
        observer: &dyn ExtractionObserver,
    ) -> Option<FieldMatch<Self::Output>>;
}

/// An extracted value with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Label of the rule or pattern that matched.
    pub rule: &'static str,
    /// Source text that was matched.
    pub source: String,
}

impl<T> FieldMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            source: source.into(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldMatch<U> {
        FieldMatch {
            value: f(self.value),
            rule: self.rule,
            source: self.source,
        }
    }
}
