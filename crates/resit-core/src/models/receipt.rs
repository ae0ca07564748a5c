//! Receipt extraction models.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured fields extracted from one receipt transcription.
///
/// Every field is extracted independently and is `None` when no rule matched.
/// Nothing is ever defaulted or synthesized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Transaction reference identifier as printed by the issuer.
    pub reference_id: Option<String>,

    /// Transaction date, serialized as `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,

    /// Monetary amount exactly as matched (up to two fraction digits).
    pub amount: Option<String>,

    /// Transaction type label from the known label list.
    pub transaction_type: Option<String>,
}

impl ExtractionResult {
    /// Date rendered in canonical year-month-day form.
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// True when no field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.reference_id.is_none()
            && self.date.is_none()
            && self.amount.is_none()
            && self.transaction_type.is_none()
    }

    /// Fields that were not found.
    pub fn missing_fields(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.reference_id.is_none() {
            missing.push(Field::ReferenceId);
        }
        if self.date.is_none() {
            missing.push(Field::Date);
        }
        if self.amount.is_none() {
            missing.push(Field::Amount);
        }
        if self.transaction_type.is_none() {
            missing.push(Field::TransactionType);
        }
        missing
    }
}

/// The four extracted receipt fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ReferenceId,
    Date,
    Amount,
    TransactionType,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ReferenceId => "reference_id",
            Field::Date => "date",
            Field::Amount => "amount",
            Field::TransactionType => "transaction_type",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receipt issuer (bank or e-wallet) used to select reference rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    /// Receipts carrying the `BANK@AM` banner.
    BankAtAm,
    /// CIMB OCTO app receipts.
    CimbOcto,
    Maybank,
    Rhb,
    /// Touch 'n Go eWallet.
    TouchNGo,
    HongLeong,
    PublicBank,
    Alliance,
    AlAwfar,
    /// No vendor marker found; the generic label rules apply.
    Unknown,
}

impl Vendor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::BankAtAm => "bank_at_am",
            Vendor::CimbOcto => "cimb_octo",
            Vendor::Maybank => "maybank",
            Vendor::Rhb => "rhb",
            Vendor::TouchNGo => "touch_n_go",
            Vendor::HongLeong => "hong_leong",
            Vendor::PublicBank => "public_bank",
            Vendor::Alliance => "alliance",
            Vendor::AlAwfar => "al_awfar",
            Vendor::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_serializes_canonically() {
        let result = ExtractionResult {
            date: NaiveDate::from_ymd_opt(2024, 3, 5),
            ..Default::default()
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["reference_id"], serde_json::Value::Null);
        assert_eq!(result.date_string().as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_missing_fields() {
        let result = ExtractionResult {
            amount: Some("7".to_string()),
            ..Default::default()
        };

        assert!(!result.is_empty());
        assert_eq!(
            result.missing_fields(),
            vec![Field::ReferenceId, Field::Date, Field::TransactionType]
        );
        assert!(ExtractionResult::default().is_empty());
    }
}
