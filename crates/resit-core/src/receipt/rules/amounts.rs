//! Amount extraction for payment receipts.
//!
//! The amount is returned as the matched string. "7" stays "7" and "7.00"
//! stays "7.00"; downstream validation decides what to accept.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::receipt::Field;
use crate::receipt::observer::{ExtractionEvent, ExtractionObserver, NullObserver, TracingObserver};

use super::normalize::TextViews;
use super::patterns::{
    AMOUNT_MYR_PAREN, AMOUNT_MYR_PAREN_LOOSE, AMOUNT_MYR_PREFIX, AMOUNT_MYR_SUFFIX,
    AMOUNT_RM_PREFIX,
};
use super::{FieldExtractor, FieldMatch};

lazy_static! {
    static ref AMOUNT_PATTERNS: [(&'static str, &'static Regex); 5] = [
        ("amount.rm_prefix", &*AMOUNT_RM_PREFIX),
        ("amount.myr_prefix", &*AMOUNT_MYR_PREFIX),
        ("amount.myr_suffix", &*AMOUNT_MYR_SUFFIX),
        ("amount.myr_paren", &*AMOUNT_MYR_PAREN),
        ("amount.myr_paren_loose", &*AMOUNT_MYR_PAREN_LOOSE),
    ];
}

/// Amount field extractor.
#[derive(Debug, Clone, Copy)]
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Search `text` (already in the amount view) for the first currency amount.
    pub fn extract_from(&self, text: &str) -> Option<FieldMatch<String>> {
        AMOUNT_PATTERNS.iter().find_map(|&(label, pattern)| {
            let caps = pattern.captures(text)?;
            let amount = caps.get(1)?;
            let source = caps.get(0).map(|m| m.as_str().trim()).unwrap_or_default();
            Some(FieldMatch::new(amount.as_str().to_string(), label, source))
        })
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = String;

    fn extract(
        &self,
        views: &TextViews<'_>,
        observer: &dyn ExtractionObserver,
    ) -> Option<FieldMatch<String>> {
        let result = self.extract_from(views.amount());

        match &result {
            Some(m) => observer.observe(&ExtractionEvent::RuleMatched {
                field: Field::Amount,
                rule: m.rule,
                value: &m.value,
            }),
            None => observer.observe(&ExtractionEvent::FieldMissed { field: Field::Amount }),
        }

        result
    }
}

/// Extract the transaction amount from raw recognized text.
pub fn extract_amount(text: &str) -> Option<String> {
    let views = TextViews::new(text);
    AmountExtractor::new()
        .extract(&views, &TracingObserver::new())
        .map(|m| m.value)
}

/// Extract an amount without emitting diagnostics.
pub fn extract_amount_quiet(text: &str) -> Option<String> {
    let views = TextViews::new(text);
    AmountExtractor::new()
        .extract(&views, &NullObserver)
        .map(|m| m.value)
}
