//! Reviewer-confirmed transactions and per-user campaign counters.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Transaction fields after a human reviewer accepted (or corrected) them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTransaction {
    pub reference_id: String,
    pub date: NaiveDate,
    /// Amount as entered; parsed during validation.
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    pub image_url: String,
}

/// Campaign counters kept on a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCounts {
    /// Transactions per campaign week; index 0 is week 1.
    pub week_counts: Vec<u32>,

    /// Transactions per calendar month (1-12) for counted months.
    pub month_counts: BTreeMap<u32, u32>,

    /// Transactions across all counted months.
    pub total_count: u32,

    /// Reference ids already confirmed for this user.
    pub confirmed: BTreeSet<String>,
}

impl UserCounts {
    /// Counters sized for a campaign of `weeks` weeks.
    pub fn with_weeks(weeks: u32) -> Self {
        Self {
            week_counts: vec![0; weeks as usize],
            ..Default::default()
        }
    }

    /// Count for a 1-based campaign week.
    pub fn week(&self, week: u32) -> u32 {
        week.checked_sub(1)
            .and_then(|i| self.week_counts.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Count for a calendar month.
    pub fn month(&self, month: u32) -> u32 {
        self.month_counts.get(&month).copied().unwrap_or(0)
    }

    /// Whether `reference_id` has already been confirmed.
    pub fn is_confirmed(&self, reference_id: &str) -> bool {
        self.confirmed.contains(reference_id.trim())
    }

    /// Remember `reference_id` as confirmed.
    pub fn record_confirmed(&mut self, reference_id: &str) {
        self.confirmed.insert(reference_id.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_lookup_is_one_based() {
        let mut counts = UserCounts::with_weeks(3);
        counts.week_counts[0] = 4;
        assert_eq!(counts.week(1), 4);
        assert_eq!(counts.week(0), 0);
        assert_eq!(counts.week(9), 0);
    }

    #[test]
    fn test_missing_sections_deserialize_empty() {
        let counts: UserCounts = serde_json::from_str(r#"{"total_count": 2}"#).unwrap();
        assert_eq!(counts.total_count, 2);
        assert!(counts.week_counts.is_empty());
        assert_eq!(counts.month(11), 0);
        assert!(counts.confirmed.is_empty());
    }

    #[test]
    fn test_confirmed_ids_ignore_padding() {
        let mut counts = UserCounts::default();
        counts.record_confirmed(" AB1 ");
        assert!(counts.is_confirmed("AB1"));
        assert!(!counts.is_confirmed("AB2"));
    }

    #[test]
    fn test_confirmed_transaction_omits_missing_type() {
        let tx = ConfirmedTransaction {
            reference_id: "R1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 11, 20).unwrap(),
            amount: "7.00".to_string(),
            transaction_type: None,
            image_url: "u".to_string(),
        };
        let json = serde_json::to_string(&tx).unwrap();
        assert!(!json.contains("transaction_type"));
        assert!(json.contains(r#""date":"2024-11-20""#));
    }
}
