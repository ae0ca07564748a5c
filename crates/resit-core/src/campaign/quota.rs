//! Week and month counters for campaign transactions.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::QuotaError;
use crate::models::config::CampaignConfig;
use crate::models::transaction::UserCounts;

/// What the updater did with a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QuotaOutcome {
    /// The date is outside the campaign; counters are unchanged.
    OutsideCampaign,
    /// Counters were updated. `week` is `None` past the last tracked week.
    Counted { week: Option<u32>, month: u32 },
}

/// Applies confirmed transactions to a user's campaign counters.
#[derive(Debug, Clone)]
pub struct QuotaUpdater {
    campaign: CampaignConfig,
}

impl QuotaUpdater {
    pub fn new(campaign: CampaignConfig) -> Self {
        Self { campaign }
    }

    /// 1-based campaign week of `date`.
    ///
    /// Days before the start give week 0 or less.
    pub fn week_index(&self, date: NaiveDate) -> i64 {
        let days = (date - self.campaign.start).num_days();
        days.div_euclid(7) + 1
    }

    /// Whether `date` falls inside the campaign, both ends inclusive.
    pub fn in_campaign(&self, date: NaiveDate) -> bool {
        date >= self.campaign.start && date <= self.campaign.end
    }

    /// Count a transaction dated `date`, as seen on `today`.
    ///
    /// Transactions from a month before the current one, or from a campaign
    /// week before the current one, are refused. Counters only change when
    /// `Ok(QuotaOutcome::Counted { .. })` is returned.
    pub fn apply(
        &self,
        counts: &mut UserCounts,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<QuotaOutcome, QuotaError> {
        if !self.in_campaign(date) {
            debug!("{} is outside the campaign, counters unchanged", date);
            return Ok(QuotaOutcome::OutsideCampaign);
        }

        let week = self.week_index(date);
        let current_week = self.week_index(today);
        let month = date.month();

        if (date.year(), month) < (today.year(), today.month()) {
            return Err(QuotaError::PastMonth);
        }
        if week < current_week {
            return Err(QuotaError::PastWeek);
        }

        let max_weeks = self.campaign.max_weeks;
        if counts.week_counts.len() < max_weeks as usize {
            counts.week_counts.resize(max_weeks as usize, 0);
        }

        let counted_week = u32::try_from(week)
            .ok()
            .filter(|w| (1..=max_weeks).contains(w));
        if let Some(w) = counted_week {
            counts.week_counts[(w - 1) as usize] += 1;
        }

        if self.campaign.counted_months.contains(&month) {
            counts.total_count += 1;
            *counts.month_counts.entry(month).or_insert(0) += 1;
        }

        info!(
            "Counted transaction of {} in week {:?}, month {}",
            date, counted_week, month
        );

        Ok(QuotaOutcome::Counted {
            week: counted_week,
            month,
        })
    }
}

impl Default for QuotaUpdater {
    fn default() -> Self {
        Self::new(CampaignConfig::default())
    }
}
