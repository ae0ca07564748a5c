//! Error types for the resit-core library.
//!
//! Field extraction itself never fails: a rule set that finds nothing yields an
//! absent field. The errors below belong to the surrounding workflow (the
//! recognition boundary, reviewer confirmation, and quota bookkeeping).

use thiserror::Error;

/// Main error type for the resit library.
#[derive(Error, Debug)]
pub enum ResitError {
    /// Text recognition boundary error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// A confirmed transaction failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Quota bookkeeping rejected the transaction.
    #[error("quota error: {0}")]
    Quota(#[from] QuotaError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised at the recognition boundary.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The service answered but returned no usable text.
    #[error("recognition returned no text: {0}")]
    NoText(String),

    /// The uploaded file is not a supported image type.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// The uploaded file exceeds the upload limit.
    #[error("image is {size_kb} KB, limit is {limit_kb} KB")]
    TooLarge { size_kb: u64, limit_kb: u64 },

    /// Transport or service failure.
    #[error("request failed: {0}")]
    Request(String),
}

/// Errors for reviewer-confirmed transaction data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Date falls outside the accepted window.
    #[error("date {date} must be between {earliest} and {latest}")]
    DateOutOfRange {
        date: chrono::NaiveDate,
        earliest: chrono::NaiveDate,
        latest: chrono::NaiveDate,
    },

    /// Amount is not a decimal number.
    #[error("amount is not a number: {0}")]
    InvalidAmount(String),

    /// Amount falls outside the accepted bounds.
    #[error("amount {amount} must be between {min} and {max}")]
    AmountOutOfRange {
        amount: String,
        min: String,
        max: String,
    },

    /// Image URL is not an absolute URL with a host.
    #[error("image_url is not a valid URL: {0}")]
    InvalidUrl(String),

    /// The reference id has already been confirmed.
    #[error("reference id {0} was already confirmed")]
    DuplicateReference(String),
}

/// Errors from week/month quota bookkeeping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotaError {
    /// The transaction belongs to a month before the current one.
    #[error("You cannot add transactions for past months.")]
    PastMonth,

    /// The transaction belongs to a campaign week before the current one.
    #[error("You cannot add transactions for past weeks.")]
    PastWeek,
}

/// Result type for the resit library.
pub type Result<T> = std::result::Result<T, ResitError>;
