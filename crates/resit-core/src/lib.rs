//! Core library for payment receipt OCR processing.
//!
//! This crate provides:
//! - Text views that tolerate common OCR letter/digit confusions
//! - Issuer classification and per-issuer reference rules
//! - Date, amount and transaction type extraction
//! - The OCR.space response boundary and upload checks
//! - Confirmation validation and campaign quota bookkeeping

pub mod campaign;
pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;

pub use campaign::{QuotaOutcome, QuotaUpdater};
pub use error::{OcrError, QuotaError, ResitError, Result, ValidationError};
pub use models::config::{CampaignConfig, ExtractionConfig, OcrConfig, ResitConfig};
pub use models::receipt::{ExtractionResult, Field, Vendor};
pub use models::transaction::{ConfirmedTransaction, UserCounts};
pub use ocr::OcrSpaceResponse;
#[cfg(feature = "native")]
pub use ocr::{UploadFormat, UploadPolicy};
pub use receipt::{
    ExtractionObserver, FieldTrace, NullObserver, ParsedReceipt, ReceiptExtractor, ReceiptParser,
    RecordingObserver, TracingObserver,
};
pub use receipt::rules::{
    classify_vendor, extract_amount, extract_date, extract_reference, extract_transaction_type,
};
