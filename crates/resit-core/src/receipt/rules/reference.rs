//! Transaction reference extraction.
//!
//! Each vendor owns an ordered rule set: a text view to search and a list of
//! `(pattern, assembly)` rules tried in order. Rules later in a list are
//! broader fallbacks and must never run before the stricter rules above them.
//! Receipts without a recognized vendor use the generic label rules.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::receipt::{Field, Vendor};
use crate::receipt::observer::{ExtractionEvent, ExtractionObserver, TracingObserver};

use super::normalize::{TextView, TextViews};
use super::patterns::*;
use super::vendor::VendorClassifier;
use super::{FieldExtractor, FieldMatch};

/// One piece of an assembled reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    /// Text of a capture group.
    Group(usize),
    /// A fixed string.
    Literal(&'static str),
}

/// How a rule turns its captures into a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assembly {
    /// Take one capture group as-is.
    Group(usize),
    /// Concatenate the pieces and drop embedded spaces.
    Compact(&'static [Piece]),
    /// Split the captured trailing text on whitespace and keep the last token.
    LastToken(usize),
}

impl Assembly {
    /// Build the reference from a match. Empty results count as no match.
    pub fn assemble(&self, caps: &Captures<'_>) -> Option<String> {
        let value = match *self {
            Assembly::Group(i) => caps.get(i)?.as_str().to_string(),
            Assembly::Compact(pieces) => {
                let mut joined = String::new();
                for piece in pieces {
                    match *piece {
                        Piece::Group(i) => joined.push_str(caps.get(i)?.as_str()),
                        Piece::Literal(s) => joined.push_str(s),
                    }
                }
                joined.replace(' ', "")
            }
            Assembly::LastToken(i) => caps
                .get(i)?
                .as_str()
                .split_whitespace()
                .last()?
                .to_string(),
        };

        if value.is_empty() { None } else { Some(value) }
    }
}

/// A reference pattern and its assembly policy.
#[derive(Debug, Clone)]
pub struct ReferenceRule {
    pub label: &'static str,
    pub pattern: &'static Regex,
    pub assembly: Assembly,
}

impl ReferenceRule {
    fn new(label: &'static str, pattern: &'static Regex, assembly: Assembly) -> Self {
        Self { label, pattern, assembly }
    }

    /// Apply the rule to `text`.
    pub fn apply(&self, text: &str) -> Option<FieldMatch<String>> {
        let caps = self.pattern.captures(text)?;
        let value = self.assembly.assemble(&caps)?;
        let source = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        Some(FieldMatch::new(value, self.label, source))
    }
}

/// The ordered rules for one vendor and the view they search.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub view: TextView,
    pub rules: Vec<ReferenceRule>,
}

const HLB_PARTS: &[Piece] = &[
    Piece::Group(1),
    Piece::Group(2),
    Piece::Literal("QR"),
    Piece::Group(3),
];

const TNG_PARTS: &[Piece] = &[Piece::Group(1), Piece::Group(2)];

lazy_static! {
    static ref RULE_SETS: HashMap<Vendor, RuleSet> = {
        use Assembly::*;

        let mut sets = HashMap::new();

        sets.insert(Vendor::BankAtAm, RuleSet {
            view: TextView::Corrected,
            rules: vec![
                ReferenceRule::new("bank_at_am.reference_no", &REF_BANK_AT_AM, Group(1)),
            ],
        });

        sets.insert(Vendor::CimbOcto, RuleSet {
            view: TextView::Corrected,
            rules: vec![
                ReferenceRule::new("cimb_octo.duitnow_reference", &REF_OCTO_DUITNOW, Group(2)),
            ],
        });

        sets.insert(Vendor::Maybank, RuleSet {
            view: TextView::Normalized,
            rules: vec![
                ReferenceRule::new("maybank.reference_i_d", &REF_MAYBANK_SPLIT_ID, Group(1)),
                ReferenceRule::new("maybank.reference_id", &REF_MAYBANK_ID, Group(1)),
            ],
        });

        sets.insert(Vendor::Rhb, RuleSet {
            view: TextView::Normalized,
            rules: vec![
                ReferenceRule::new("rhb.qr_split_digits", &REF_RHB_SPLIT, Compact(&[Piece::Group(1)])),
                ReferenceRule::new("rhb.qr", &REF_RHB, Group(1)),
            ],
        });

        sets.insert(Vendor::TouchNGo, RuleSet {
            view: TextView::Corrected,
            rules: vec![
                ReferenceRule::new("touch_n_go.qr_transaction_no", &REF_TNG_SPLIT, Compact(TNG_PARTS)),
                ReferenceRule::new("touch_n_go.transaction_no_last_token", &REF_TNG_TRAILING, LastToken(1)),
            ],
        });

        sets.insert(Vendor::HongLeong, RuleSet {
            view: TextView::Normalized,
            rules: vec![
                ReferenceRule::new("hong_leong.qr_letter_o", &REF_HLB_QR_LETTER, Compact(HLB_PARTS)),
                ReferenceRule::new("hong_leong.qr_digit_0", &REF_HLB_QR_DIGIT, Compact(HLB_PARTS)),
                ReferenceRule::new("hong_leong.rm_letter_o", &REF_HLB_RM_LETTER, Compact(HLB_PARTS)),
                ReferenceRule::new("hong_leong.rm_digit_0", &REF_HLB_RM_DIGIT, Compact(HLB_PARTS)),
            ],
        });

        sets.insert(Vendor::PublicBank, RuleSet {
            view: TextView::Normalized,
            rules: vec![
                ReferenceRule::new("public_bank.duitnow_qr_ref_no", &REF_PUBLIC_QR, Group(1)),
            ],
        });

        sets.insert(Vendor::Alliance, RuleSet {
            view: TextView::Normalized,
            rules: vec![
                ReferenceRule::new("alliance.duitnow_qr_reference_number", &REF_ALLIANCE_QR, Group(1)),
            ],
        });

        sets.insert(Vendor::AlAwfar, RuleSet {
            view: TextView::Normalized,
            rules: vec![
                ReferenceRule::new("al_awfar.duitnow_qr_ref_no", &REF_AL_AWFAR_QR, Group(1)),
            ],
        });

        sets.insert(Vendor::Unknown, RuleSet {
            view: TextView::Normalized,
            rules: vec![
                ReferenceRule::new("generic.reference_id", &REF_LABEL_REFERENCE_ID, Group(1)),
                ReferenceRule::new("generic.transaction_no", &REF_LABEL_TRANSACTION_NO, Group(1)),
                ReferenceRule::new("generic.reference_no", &REF_LABEL_REFERENCE_NO, Group(1)),
                ReferenceRule::new("generic.reference_number", &REF_LABEL_REFERENCE_NUMBER, Group(1)),
            ],
        });

        sets
    };
}

/// Rule set for a vendor.
pub fn rule_set(vendor: Vendor) -> Option<&'static RuleSet> {
    RULE_SETS.get(&vendor)
}

/// Reference field extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceExtractor {
    classifier: VendorClassifier,
}

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self {
            classifier: VendorClassifier::new(),
        }
    }

    /// Apply a vendor's rule set, ignoring the classifier.
    ///
    /// A recognized vendor whose rules all fail yields `None`; the generic
    /// rules only run for [`Vendor::Unknown`].
    pub fn extract_for_vendor(
        &self,
        vendor: Vendor,
        views: &TextViews<'_>,
        observer: &dyn ExtractionObserver,
    ) -> Option<FieldMatch<String>> {
        let result = rule_set(vendor).and_then(|set| {
            let text = views.get(set.view);
            set.rules.iter().find_map(|rule| rule.apply(text))
        });

        match &result {
            Some(m) => observer.observe(&ExtractionEvent::RuleMatched {
                field: Field::ReferenceId,
                rule: m.rule,
                value: &m.value,
            }),
            None => observer.observe(&ExtractionEvent::FieldMissed {
                field: Field::ReferenceId,
            }),
        }

        result
    }
}

impl FieldExtractor for ReferenceExtractor {
    type Output = String;

    fn extract(
        &self,
        views: &TextViews<'_>,
        observer: &dyn ExtractionObserver,
    ) -> Option<FieldMatch<String>> {
        let vendor = self.classifier.classify(views, observer);
        self.extract_for_vendor(vendor, views, observer)
    }
}

/// Extract the transaction reference from raw recognized text.
pub fn extract_reference(text: &str) -> Option<String> {
    let views = TextViews::new(text);
    ReferenceExtractor::new()
        .extract(&views, &TracingObserver::new())
        .map(|m| m.value)
}
