//! Configuration structures for recognition, extraction, and the campaign.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Environment variable consulted when no OCR.space key is configured.
pub const OCR_API_KEY_ENV: &str = "OCR_SPACE_API_KEY";

/// Main configuration for resit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResitConfig {
    /// Recognition service configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Campaign window and quota configuration.
    pub campaign: CampaignConfig,
}

/// OCR.space client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Parse endpoint.
    pub endpoint: String,

    /// API key. Falls back to `OCR_SPACE_API_KEY` when unset.
    pub api_key: Option<String>,

    /// Recognition language code.
    pub language: String,

    /// Request word overlay coordinates.
    pub overlay: bool,

    /// Largest accepted upload in kilobytes.
    pub max_upload_kb: u64,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.ocr.space/parse/image".to_string(),
            api_key: None,
            language: "eng".to_string(),
            overlay: false,
            max_upload_kb: 2048,
            timeout_secs: 30,
        }
    }
}

impl OcrConfig {
    /// Configured key, or the environment fallback.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(OCR_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Emit the normalized text views at debug level.
    pub log_text: bool,

    /// Characters scanned after the "Transaction Type" label.
    pub type_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            log_text: true,
            type_window: 40,
        }
    }
}

/// Campaign window and quota limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    /// First day of the campaign (inclusive).
    pub start: NaiveDate,

    /// Last day of the campaign (inclusive).
    pub end: NaiveDate,

    /// Number of tracked campaign weeks.
    pub max_weeks: u32,

    /// Months that count toward the campaign total.
    pub counted_months: Vec<u32>,

    /// Smallest accepted amount.
    pub min_amount: Decimal,

    /// Largest accepted amount.
    pub max_amount: Decimal,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 11, 10).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            max_weeks: 8,
            counted_months: vec![11, 12],
            min_amount: Decimal::new(1, 2),
            max_amount: Decimal::new(99_999_999, 2),
        }
    }
}

impl ResitConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResitConfig::default();
        assert_eq!(config.ocr.max_upload_kb, 2048);
        assert_eq!(config.extraction.type_window, 40);
        assert_eq!(config.campaign.start, NaiveDate::from_ymd_opt(2024, 11, 10).unwrap());
        assert_eq!(config.campaign.max_amount.to_string(), "999999.99");
        assert_eq!(config.campaign.min_amount.to_string(), "0.01");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ResitConfig =
            serde_json::from_str(r#"{"campaign": {"max_weeks": 4}}"#).unwrap();
        assert_eq!(config.campaign.max_weeks, 4);
        assert_eq!(config.campaign.counted_months, vec![11, 12]);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = OcrConfig {
            api_key: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("abc"));
    }
}
