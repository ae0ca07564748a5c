//! Diagnostic hooks for the extraction pass.
//!
//! Extractors report what they tried through an [`ExtractionObserver`]. The
//! observer only watches: nothing it does can change an extraction result.

use std::sync::Mutex;

use tracing::{debug, trace};

use crate::models::receipt::{Field, Vendor};

use super::rules::normalize::TextView;

/// One diagnostic event emitted during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionEvent<'a> {
    /// A text view was derived.
    TextPrepared { view: TextView, text: &'a str },

    /// The vendor classifier made its decision.
    VendorClassified { vendor: Vendor, marker: Option<&'static str> },

    /// A rule produced a field value.
    RuleMatched { field: Field, rule: &'static str, value: &'a str },

    /// A date candidate did not fit one format template.
    DateFormatRejected { candidate: &'a str, format: &'static str, reason: String },

    /// Every rule for the field was exhausted.
    FieldMissed { field: Field },
}

/// Receiver of extraction diagnostics.
pub trait ExtractionObserver: Send + Sync {
    fn observe(&self, event: &ExtractionEvent<'_>);
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ExtractionObserver for NullObserver {
    fn observe(&self, _event: &ExtractionEvent<'_>) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    log_text: bool,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self { log_text: true }
    }

    /// Whether prepared text views are logged.
    pub fn with_text_logging(mut self, log_text: bool) -> Self {
        self.log_text = log_text;
        self
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionObserver for TracingObserver {
    fn observe(&self, event: &ExtractionEvent<'_>) {
        match event {
            ExtractionEvent::TextPrepared { view, text } => {
                if self.log_text {
                    debug!(%view, text = %text, "prepared text view");
                }
            }
            ExtractionEvent::VendorClassified { vendor, marker } => {
                debug!(%vendor, marker = marker.unwrap_or("-"), "classified vendor");
            }
            ExtractionEvent::RuleMatched { field, rule, value } => {
                debug!(%field, rule, value = %value, "rule matched");
            }
            ExtractionEvent::DateFormatRejected { candidate, format, reason } => {
                trace!(candidate = %candidate, format, reason = %reason, "date format rejected");
            }
            ExtractionEvent::FieldMissed { field } => {
                debug!(%field, "no rule matched");
            }
        }
    }
}

/// Records a compact description of every event, for tests and `--explain`.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ExtractionObserver for RecordingObserver {
    fn observe(&self, event: &ExtractionEvent<'_>) {
        let line = match event {
            ExtractionEvent::TextPrepared { view, .. } => format!("prepared {view}"),
            ExtractionEvent::VendorClassified { vendor, .. } => format!("vendor {vendor}"),
            ExtractionEvent::RuleMatched { field, rule, value } => {
                format!("{field} <- {rule}: {value}")
            }
            ExtractionEvent::DateFormatRejected { candidate, format, .. } => {
                format!("date {candidate:?} rejected by {format}")
            }
            ExtractionEvent::FieldMissed { field } => format!("{field} missed"),
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(line);
        }
    }
}
