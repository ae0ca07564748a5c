//! Text normalization and the per-field views of one transcription.
//!
//! OCR output is normalized once per receipt into a handful of named views.
//! The letter-to-digit substitutions differ between views: vendor markers
//! contain the very letters the reference substitution rewrites, and dates and
//! amounts only tolerate a subset of it. Each extractor picks the view it needs
//! and every view is computed lazily and cached for the duration of one pass.

use std::borrow::Cow;
use std::cell::OnceCell;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::patterns::{MYR_PAREN_SPACING, WHITESPACE};

/// Substitutions applied for reference-number recovery.
pub const REFERENCE_CONFUSIONS: &[(char, char)] = &[('I', '1'), ('O', '0'), ('S', '5')];

/// Substitutions applied before date matching.
pub const DATE_CONFUSIONS: &[(char, char)] = &[('I', '1'), ('S', '5')];

/// Substitutions applied before amount matching.
pub const AMOUNT_CONFUSIONS: &[(char, char)] = &[('I', '1'), ('O', '0')];

/// A named derivation of the recognized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextView {
    /// The transcription exactly as received.
    Raw,
    /// Line breaks and whitespace runs collapsed to single spaces.
    Normalized,
    /// Normalized plus the reference substitutions.
    Corrected,
    /// Raw text with the date substitutions.
    Date,
    /// Normalized plus the amount substitutions and a canonical "(MYR)".
    Amount,
}

impl fmt::Display for TextView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextView::Raw => "raw",
            TextView::Normalized => "normalized",
            TextView::Corrected => "corrected",
            TextView::Date => "date",
            TextView::Amount => "amount",
        };
        f.write_str(name)
    }
}

/// Collapse line breaks and whitespace runs into single spaces.
///
/// Leading and trailing whitespace is collapsed, not trimmed.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

/// Apply a context-free one-to-one character substitution table.
pub fn apply_confusions(text: &str, table: &[(char, char)]) -> String {
    text.chars()
        .map(|c| {
            table
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Rewrite spacing variants such as "( MY R )" to "(MYR)".
pub fn canonicalize_currency_marker(text: &str) -> Cow<'_, str> {
    MYR_PAREN_SPACING.replace_all(text, "(MYR)")
}

/// Lazily derived views of one recognized text.
#[derive(Debug)]
pub struct TextViews<'a> {
    raw: &'a str,
    normalized: OnceCell<String>,
    corrected: OnceCell<String>,
    date: OnceCell<String>,
    amount: OnceCell<String>,
}

impl<'a> TextViews<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            normalized: OnceCell::new(),
            corrected: OnceCell::new(),
            date: OnceCell::new(),
            amount: OnceCell::new(),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn normalized(&self) -> &str {
        self.normalized.get_or_init(|| normalize_whitespace(self.raw))
    }

    pub fn corrected(&self) -> &str {
        self.corrected
            .get_or_init(|| apply_confusions(self.normalized(), REFERENCE_CONFUSIONS))
    }

    pub fn date(&self) -> &str {
        self.date
            .get_or_init(|| apply_confusions(self.raw, DATE_CONFUSIONS))
    }

    pub fn amount(&self) -> &str {
        self.amount.get_or_init(|| {
            let text = apply_confusions(self.normalized(), AMOUNT_CONFUSIONS);
            canonicalize_currency_marker(&text).into_owned()
        })
    }

    pub fn get(&self, view: TextView) -> &str {
        match view {
            TextView::Raw => self.raw,
            TextView::Normalized => self.normalized(),
            TextView::Corrected => self.corrected(),
            TextView::Date => self.date(),
            TextView::Amount => self.amount(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("Reference No.\r\n  AB123\n\nRM 5.00"),
            "Reference No. AB123 RM 5.00"
        );
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_corrected_view_rewrites_letters() {
        let views = TextViews::new("OCTO\nIS 1O");
        assert_eq!(views.normalized(), "OCTO IS 1O");
        assert_eq!(views.corrected(), "0CT0 15 10");
    }

    #[test]
    fn test_views_keep_vendor_letters_apart() {
        let views = TextViews::new("Maybank SIO");
        assert!(views.normalized().contains("Maybank"));
        assert_eq!(views.date(), "Maybank 51O");
        assert_eq!(views.amount(), "Maybank S10");
    }

    #[test]
    fn test_amount_view_canonicalizes_marker() {
        let views = TextViews::new("Amount ( MY R )\n7.00");
        assert_eq!(views.amount(), "Amount (MYR) 7.00");
    }

    #[test]
    fn test_lowercase_letters_untouched() {
        assert_eq!(apply_confusions("Reference No.", REFERENCE_CONFUSIONS), "Reference No.");
    }
}
