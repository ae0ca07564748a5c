//! Common regex patterns for receipt field extraction.
//!
//! Reference patterns are grouped by issuer. Within a group the order in which
//! the rule tables use them matters: broader patterns only run after the
//! stricter ones have failed.
//!
//! Digit and word classes are ASCII-only, so digits from other scripts
//! never end up in a reference or date.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Whitespace and line breaks
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Spacing variants of the "(MYR)" marker
    pub static ref MYR_PAREN_SPACING: Regex = Regex::new(
        r"(?i)\(\s*MY\s*R\s*\)"
    ).unwrap();

    // BANK@AM
    pub static ref REF_BANK_AT_AM: Regex = Regex::new(
        r"(?i)Reference No.\s*[\r\n]?\s*((?-u:\w)+)"
    ).unwrap();

    // CIMB OCTO: 9-digit prefix followed by the 8-digit reference
    pub static ref REF_OCTO_DUITNOW: Regex = Regex::new(
        r"(?i)DuitNow Reference No.*?([0-9]{9})\s([0-9]{8})"
    ).unwrap();

    // Maybank ("Reference I D" is a common misread)
    pub static ref REF_MAYBANK_SPLIT_ID: Regex = Regex::new(
        r"(?i)Reference I D.*?([0-9]{8})"
    ).unwrap();

    pub static ref REF_MAYBANK_ID: Regex = Regex::new(
        r"(?i)Reference ID.*?([0-9]{8})"
    ).unwrap();

    // RHB DuitNow QR references
    pub static ref REF_RHB_SPLIT: Regex = Regex::new(
        r"(?i)([0-9]{8}RHBBMYKL(?-u:\w)+QR\s*[0-9]{3}\s*[0-9]{5})"
    ).unwrap();

    pub static ref REF_RHB: Regex = Regex::new(
        r"(?i)([0-9]{8}RHBBMYKL(?-u:\w)+QR(?-u:\w)+)"
    ).unwrap();

    // Touch 'n Go eWallet
    pub static ref REF_TNG_SPLIT: Regex = Regex::new(
        r"(?i)([0-9]{8}TNGDMYNB[0-9]{4}QR)\s*Transaction No\.\s*((?-u:\w)+)"
    ).unwrap();

    pub static ref REF_TNG_TRAILING: Regex = Regex::new(
        r"(?i)Transaction No\.\s*(.+)"
    ).unwrap();

    // Hong Leong: the BIC suffix is read as either "O" or "0", and "QR" is
    // sometimes read as "R M"
    pub static ref REF_HLB_QR_LETTER: Regex = Regex::new(
        r"(?i)([0-9]{8}HLBBMYKLO)\s*([0-9]{3,4})QR([0-9]{8})"
    ).unwrap();

    pub static ref REF_HLB_QR_DIGIT: Regex = Regex::new(
        r"(?i)([0-9]{8}HLBBMYKL0)\s*([0-9]{3,4})QR([0-9]{8})"
    ).unwrap();

    pub static ref REF_HLB_RM_LETTER: Regex = Regex::new(
        r"(?i)([0-9]{8}HLBBMYKLO)\s*([0-9]{3,4})R\s*M([0-9]{8})"
    ).unwrap();

    pub static ref REF_HLB_RM_DIGIT: Regex = Regex::new(
        r"(?i)([0-9]{8}HLBBMYKL0)\s*([0-9]{3,4})R\s*M([0-9]{8})"
    ).unwrap();

    // Public Bank
    pub static ref REF_PUBLIC_QR: Regex = Regex::new(
        r"(?i)DuitNow QR Ref No.*?([0-9]{8})"
    ).unwrap();

    // Alliance Bank
    pub static ref REF_ALLIANCE_QR: Regex = Regex::new(
        r"(?is)DuitNow QR Reference.*?Number.*?([0-9]{8})"
    ).unwrap();

    // Al-Awfar
    pub static ref REF_AL_AWFAR_QR: Regex = Regex::new(
        r"(?i)DuitNow\s*QR\s*Ref\s*No\s*[:\-]?\s*([0-9]{8})"
    ).unwrap();

    // Generic label-anchored references
    pub static ref REF_LABEL_REFERENCE_ID: Regex = Regex::new(
        r"(?i)Reference ID\s*[\r\n]?\s*((?-u:\w)+)"
    ).unwrap();

    pub static ref REF_LABEL_TRANSACTION_NO: Regex = Regex::new(
        r"(?i)Transaction No.\s*[\r\n]?\s*((?-u:\w)+)"
    ).unwrap();

    pub static ref REF_LABEL_REFERENCE_NO: Regex = Regex::new(
        r"(?i)Reference No.\s*[\r\n]?\s*((?-u:\w)+)"
    ).unwrap();

    pub static ref REF_LABEL_REFERENCE_NUMBER: Regex = Regex::new(
        r"(?i)Reference Number\s*[\r\n]?\s*((?-u:\w)+)"
    ).unwrap();

    // Dates: "15 Oct 2024 05:03 pm", "28 Sep 2024, 4:13 PM"
    pub static ref DATE_WITH_TIME: Regex = Regex::new(
        r"(?i)([0-9]{1,2}\s*(?-u:\w){3,}\s*[0-9]{4})\s*,?\s*[0-9]{1,2}:[0-9]{2}\s*(AM|PM)?"
    ).unwrap();

    // "15 Oct 2024"
    pub static ref DATE_NAMED_MONTH: Regex = Regex::new(
        r"(?i)([0-9]{1,2}\s*(?-u:\w){3,}\s*[0-9]{4})"
    ).unwrap();

    // "16/10/2024", "16-10-2024"
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"([0-9]{1,2}[-/][0-9]{1,2}[-/][0-9]{4})"
    ).unwrap();

    // "22-Nov-2024"
    pub static ref DATE_NAMED_MONTH_DASHED: Regex = Regex::new(
        r"(?i)([0-9]{1,2}-(?-u:\w){3,}-[0-9]{4})"
    ).unwrap();

    // "15 Oct 2024 05:05:14 PM"
    pub static ref DATE_WITH_SECONDS: Regex = Regex::new(
        r"(?i)([0-9]{1,2}\s*(?-u:\w){3,}\s*[0-9]{4})\s*([0-9]{1,2}:[0-9]{2}:[0-9]{2}\s*(AM|PM)?)"
    ).unwrap();

    // Amounts: "RM 7.00", "-RM7.00", "RM-7.00"
    pub static ref AMOUNT_RM_PREFIX: Regex = Regex::new(
        r"(?i)(?:^|\s)-?\s*RM[\s\-]*([0-9]+(?:\.[0-9]{2})?)"
    ).unwrap();

    // "MYR 7.00"
    pub static ref AMOUNT_MYR_PREFIX: Regex = Regex::new(
        r"(?i)MYR\s*([0-9]+(?:\.[0-9]{2})?)"
    ).unwrap();

    // "7.00 MYR"
    pub static ref AMOUNT_MYR_SUFFIX: Regex = Regex::new(
        r"(?i)([0-9]+(?:\.[0-9]{2})?)\s*MYR"
    ).unwrap();

    // "(MYR) 7.00"
    pub static ref AMOUNT_MYR_PAREN: Regex = Regex::new(
        r"(?i)\(MYR\)\s*([0-9]+(?:\.[0-9]{2})?)"
    ).unwrap();

    // "(MYR) Amount 7.00"
    pub static ref AMOUNT_MYR_PAREN_LOOSE: Regex = Regex::new(
        r"(?i)\(MYR\).*?([0-9]+(?:\.[0-9]{2})?)"
    ).unwrap();

    // Transaction type label
    pub static ref TRANSACTION_TYPE_LABEL: Regex = Regex::new(
        r"(?i)Transaction Type"
    ).unwrap();
}
