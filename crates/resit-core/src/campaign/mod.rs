//! Reviewer confirmation and campaign quota bookkeeping.
//!
//! Nothing here runs during extraction. A transaction is validated once a
//! reviewer accepts it, and only a valid transaction reaches the quota
//! updater.

mod confirm;
mod quota;

pub use quota::{QuotaOutcome, QuotaUpdater};
