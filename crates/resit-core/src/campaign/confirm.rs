//! Checks on reviewer-confirmed transaction data.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use url::Url;

use crate::error::ValidationError;
use crate::models::config::CampaignConfig;
use crate::models::transaction::{ConfirmedTransaction, UserCounts};

impl ConfirmedTransaction {
    /// Validate the confirmed fields against the campaign window.
    ///
    /// The date may not precede the campaign start or follow `today`. The
    /// first failing check is reported.
    pub fn validate(&self, campaign: &CampaignConfig, today: NaiveDate) -> Result<Decimal, ValidationError> {
        if self.reference_id.trim().is_empty() {
            return Err(ValidationError::MissingField("reference_id"));
        }

        if self.date < campaign.start || self.date > today {
            return Err(ValidationError::DateOutOfRange {
                date: self.date,
                earliest: campaign.start,
                latest: today,
            });
        }

        let amount = self.parsed_amount()?;
        if amount < campaign.min_amount || amount > campaign.max_amount {
            return Err(ValidationError::AmountOutOfRange {
                amount: self.amount.trim().to_string(),
                min: campaign.min_amount.to_string(),
                max: campaign.max_amount.to_string(),
            });
        }

        let image_url = self.image_url.trim();
        if image_url.is_empty() {
            return Err(ValidationError::MissingField("image_url"));
        }
        match Url::parse(image_url) {
            Ok(url) if url.has_host() => {}
            _ => return Err(ValidationError::InvalidUrl(image_url.to_string())),
        }

        debug!("Confirmed transaction {} for {}", self.reference_id, self.date);
        Ok(amount)
    }

    /// Refuse a reference id that `counts` has already confirmed.
    pub fn ensure_unique(&self, counts: &UserCounts) -> Result<(), ValidationError> {
        if counts.is_confirmed(&self.reference_id) {
            return Err(ValidationError::DuplicateReference(
                self.reference_id.trim().to_string(),
            ));
        }
        Ok(())
    }

    /// The amount as a decimal.
    pub fn parsed_amount(&self) -> Result<Decimal, ValidationError> {
        let raw = self.amount.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingField("amount"));
        }
        Decimal::from_str(raw).map_err(|_| ValidationError::InvalidAmount(raw.to_string()))
    }
}
