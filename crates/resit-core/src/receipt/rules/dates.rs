//! Date extraction for payment receipts.
//!
//! Date-shaped patterns are tried in order. Every match of a pattern is parsed
//! against the format templates in order; the first successful parse wins. A
//! candidate that no template accepts is a soft miss and the search moves on.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::models::receipt::Field;
use crate::receipt::observer::{ExtractionEvent, ExtractionObserver, NullObserver, TracingObserver};

use super::normalize::TextViews;
use super::patterns::{
    DATE_NAMED_MONTH, DATE_NAMED_MONTH_DASHED, DATE_NUMERIC, DATE_WITH_SECONDS, DATE_WITH_TIME,
};
use super::{FieldExtractor, FieldMatch};

/// A date format template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormat {
    pub label: &'static str,
    pub pattern: &'static str,
}

/// Format templates in the order they are tried.
pub const DATE_FORMATS: &[DateFormat] = &[
    DateFormat { label: "d M Y", pattern: "%d %B %Y" },
    DateFormat { label: "d/m/Y", pattern: "%d/%m/%Y" },
    DateFormat { label: "d-m-Y", pattern: "%d-%m-%Y" },
    DateFormat { label: "d-M-Y", pattern: "%d-%B-%Y" },
];

lazy_static! {
    static ref DATE_PATTERNS: [(&'static str, &'static Regex); 5] = [
        ("date.with_time", &*DATE_WITH_TIME),
        ("date.named_month", &*DATE_NAMED_MONTH),
        ("date.numeric", &*DATE_NUMERIC),
        ("date.named_month_dashed", &*DATE_NAMED_MONTH_DASHED),
        ("date.with_seconds", &*DATE_WITH_SECONDS),
    ];
}

/// Collapse whitespace and separate glued day/month/year tokens, so
/// "15Oct2024" and "15  Oct 2024" both read as "15 Oct 2024".
fn canonical_candidate(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len() + 2);
    let mut prev: Option<char> = None;

    for c in candidate.trim().chars() {
        if c.is_whitespace() {
            if prev != Some(' ') {
                out.push(' ');
            }
            prev = Some(' ');
            continue;
        }
        if let Some(p) = prev {
            let boundary = (p.is_ascii_digit() && c.is_alphabetic())
                || (p.is_alphabetic() && c.is_ascii_digit());
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }

    out
}

/// Parse one matched date substring against the format templates.
pub fn parse_date_candidate(
    candidate: &str,
    observer: &dyn ExtractionObserver,
) -> Option<(NaiveDate, &'static DateFormat)> {
    let canonical = canonical_candidate(candidate);

    for format in DATE_FORMATS {
        match NaiveDate::parse_from_str(&canonical, format.pattern) {
            Ok(date) => return Some((date, format)),
            Err(e) => observer.observe(&ExtractionEvent::DateFormatRejected {
                candidate,
                format: format.label,
                reason: e.to_string(),
            }),
        }
    }

    None
}

/// Date field extractor.
#[derive(Debug, Clone, Copy)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Search `text` (already in the date view) for the first parseable date.
    pub fn extract_from(
        &self,
        text: &str,
        observer: &dyn ExtractionObserver,
    ) -> Option<FieldMatch<NaiveDate>> {
        for &(label, pattern) in DATE_PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                let Some(candidate) = caps.get(1) else {
                    continue;
                };
                if let Some((date, _)) = parse_date_candidate(candidate.as_str(), observer) {
                    return Some(FieldMatch::new(date, label, candidate.as_str()));
                }
            }
        }
        None
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn extract(
        &self,
        views: &TextViews<'_>,
        observer: &dyn ExtractionObserver,
    ) -> Option<FieldMatch<NaiveDate>> {
        let result = self.extract_from(views.date(), observer);

        match &result {
            Some(m) => {
                let value = m.value.format("%Y-%m-%d").to_string();
                observer.observe(&ExtractionEvent::RuleMatched {
                    field: Field::Date,
                    rule: m.rule,
                    value: &value,
                });
            }
            None => observer.observe(&ExtractionEvent::FieldMissed { field: Field::Date }),
        }

        result
    }
}

/// Extract the transaction date from raw recognized text.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    let views = TextViews::new(text);
    DateExtractor::new()
        .extract(&views, &TracingObserver::new())
        .map(|m| m.value)
}

/// Parse a single date string as entered or recognized, in canonical form.
pub fn parse_receipt_date(text: &str) -> Option<String> {
    DateExtractor::new()
        .extract_from(text, &NullObserver)
        .map(|m| m.value.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::observer::RecordingObserver;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_with_time() {
        assert_eq!(extract_date("15 Oct 2024 05:03 pm"), Some(ymd(2024, 10, 15)));
        assert_eq!(extract_date("Date: 28 Nov 2024, 4:13 PM"), Some(ymd(2024, 11, 28)));
        assert_eq!(extract_date("15 Oct 2024 05:05:14 PM"), Some(ymd(2024, 10, 15)));
    }

    #[test]
    fn test_uppercase_s_month_is_not_recovered() {
        // The date view rewrites S as 5, so "Sep" reads as "5ep".
        assert_eq!(extract_date("28 Sep 2024"), None);
        assert_eq!(extract_date("28 Sep 2024 or 29/09/2024"), Some(ymd(2024, 9, 29)));
    }

    #[test]
    fn test_named_month() {
        assert_eq!(extract_date("Paid on 15 Oct 2024"), Some(ymd(2024, 10, 15)));
        assert_eq!(extract_date("15Oct2024"), Some(ymd(2024, 10, 15)));
        assert_eq!(extract_date("3 December 2024"), Some(ymd(2024, 12, 3)));
    }

    #[test]
    fn test_numeric() {
        assert_eq!(extract_date("16/10/2024"), Some(ymd(2024, 10, 16)));
        assert_eq!(extract_date("16-10-2024"), Some(ymd(2024, 10, 16)));
    }

    #[test]
    fn test_named_month_dashed() {
        assert_eq!(extract_date("22-Nov-2024"), Some(ymd(2024, 11, 22)));
    }

    #[test]
    fn test_single_digit_day_is_zero_padded() {
        let views = TextViews::new("5 Nov 2024 9:01 AM");
        let m = DateExtractor::new().extract(&views, &NullObserver).unwrap();
        assert_eq!(m.value.format("%Y-%m-%d").to_string(), "2024-11-05");
        assert_eq!(parse_receipt_date("1/2/2024").as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_date_view_corrects_i_as_one() {
        assert_eq!(extract_date("I5 Oct 2024"), Some(ymd(2024, 10, 15)));
    }

    #[test]
    fn test_unparseable_candidate_moves_on() {
        // The first named-month candidate is a digit run; the later numeric
        // date still parses.
        let text = "Ref 123456789012 on 16/10/2024";
        assert_eq!(extract_date(text), Some(ymd(2024, 10, 16)));
    }

    #[test]
    fn test_rejections_are_observed() {
        let observer = RecordingObserver::new();
        assert!(parse_date_candidate("31/02/2024", &observer).is_none());
        let events = observer.events();
        assert_eq!(events.len(), DATE_FORMATS.len());
        assert!(events[1].contains("d/m/Y"));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date("no dates here"), None);
        assert_eq!(extract_date(""), None);
    }

    #[test]
    fn test_canonical_candidate() {
        assert_eq!(canonical_candidate("15Oct2024"), "15 Oct 2024");
        assert_eq!(canonical_candidate(" 15 \n Oct  2024"), "15 Oct 2024");
        assert_eq!(canonical_candidate("22-Nov-2024"), "22-Nov-2024");
    }
}
