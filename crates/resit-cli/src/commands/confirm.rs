//! Confirm command - validate a reviewed transaction and count it.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::info;

use resit_core::campaign::{QuotaOutcome, QuotaUpdater};
use resit_core::models::transaction::{ConfirmedTransaction, UserCounts};

use super::load_config;

/// Arguments for the confirm command.
#[derive(Args)]
pub struct ConfirmArgs {
    /// Transaction reference
    #[arg(long)]
    reference: String,

    /// Transaction date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,

    /// Transaction amount
    #[arg(long)]
    amount: String,

    /// Transaction type
    #[arg(long = "type")]
    transaction_type: Option<String>,

    /// URL of the stored receipt image
    #[arg(long)]
    image_url: String,

    /// JSON file holding the user's campaign counters
    #[arg(long)]
    counts: PathBuf,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

pub async fn run(args: ConfirmArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let transaction = ConfirmedTransaction {
        reference_id: args.reference,
        date: args.date,
        amount: args.amount,
        transaction_type: args.transaction_type,
        image_url: args.image_url,
    };

    transaction.validate(&config.campaign, today)?;

    let mut counts = if args.counts.exists() {
        let content = fs::read_to_string(&args.counts)?;
        serde_json::from_str::<UserCounts>(&content)?
    } else {
        UserCounts::with_weeks(config.campaign.max_weeks)
    };

    transaction.ensure_unique(&counts)?;

    let updater = QuotaUpdater::new(config.campaign.clone());
    let outcome = updater.apply(&mut counts, transaction.date, today)?;

    counts.record_confirmed(&transaction.reference_id);
    fs::write(&args.counts, serde_json::to_string_pretty(&counts)?)?;
    info!("Updated counters in {}", args.counts.display());

    match outcome {
        QuotaOutcome::OutsideCampaign => {
            println!(
                "{} {} is outside the campaign, counters unchanged",
                style("ℹ").blue(),
                transaction.date
            );
        }
        QuotaOutcome::Counted { week, month } => {
            let week = week.map(|w| w.to_string()).unwrap_or_else(|| "-".to_string());
            println!(
                "{} Confirmed {} (week {}, month {}), total {}",
                style("✓").green(),
                transaction.reference_id,
                week,
                month,
                counts.total_count
            );
        }
    }

    Ok(())
}
