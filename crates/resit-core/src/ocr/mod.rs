//! Recognition boundary: the OCR.space response and upload checks.
//!
//! The HTTP request itself is made by the caller; this module only knows the
//! form fields the service expects and how to read its answer.

#[cfg(feature = "native")]
mod upload;

#[cfg(feature = "native")]
pub use upload::{UploadFormat, UploadPolicy};

use serde::{Deserialize, Serialize};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// One page of recognized text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParsedResult {
    #[serde(default)]
    pub parsed_text: Option<String>,

    #[serde(default)]
    pub error_message: Option<String>,
}

/// The service reports errors either as one string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessages {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessages {
    fn join(&self) -> String {
        match self {
            ErrorMessages::One(message) => message.clone(),
            ErrorMessages::Many(messages) => messages.join("; "),
        }
    }
}

/// Response body of `POST /parse/image`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OcrSpaceResponse {
    #[serde(default)]
    pub parsed_results: Vec<ParsedResult>,

    #[serde(rename = "OCRExitCode", default)]
    pub ocr_exit_code: Option<u8>,

    #[serde(default)]
    pub is_errored_on_processing: bool,

    #[serde(default)]
    pub error_message: Option<ErrorMessages>,
}

impl OcrSpaceResponse {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self, OcrError> {
        serde_json::from_str(body).map_err(|e| OcrError::Request(format!("invalid response: {e}")))
    }

    /// Text of the first parsed result.
    pub fn text(&self) -> Result<&str, OcrError> {
        self.parsed_results
            .first()
            .and_then(|r| r.parsed_text.as_deref())
            .ok_or_else(|| OcrError::NoText(self.error_summary()))
    }

    /// Take the text of the first parsed result.
    pub fn into_text(mut self) -> Result<String, OcrError> {
        let has_text = self
            .parsed_results
            .first()
            .is_some_and(|r| r.parsed_text.is_some());
        if !has_text {
            return Err(OcrError::NoText(self.error_summary()));
        }
        Ok(self.parsed_results.swap_remove(0).parsed_text.unwrap_or_default())
    }

    /// Every error message the service returned, or a generic note.
    pub fn error_summary(&self) -> String {
        let mut messages = Vec::new();
        if let Some(top) = &self.error_message {
            messages.push(top.join());
        }
        messages.extend(
            self.parsed_results
                .iter()
                .filter_map(|r| r.error_message.clone())
                .filter(|m| !m.is_empty()),
        );

        if messages.is_empty() {
            match self.ocr_exit_code {
                Some(code) => format!("exit code {code}"),
                None => "no parsed results".to_string(),
            }
        } else {
            messages.join("; ")
        }
    }
}

/// Form fields sent alongside the `file` part.
pub fn form_fields(config: &OcrConfig, api_key: &str) -> Vec<(&'static str, String)> {
    vec![
        ("apikey", api_key.to_string()),
        ("language", config.language.clone()),
        ("isOverlayRequired", config.overlay.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_successful_response() {
        let body = r#"{
            "ParsedResults": [
                {"TextOverlay": {"Lines": []}, "FileParseExitCode": 1,
                 "ParsedText": "RM 7.00\r\nReference No. AB1\r\n", "ErrorMessage": ""}
            ],
            "OCRExitCode": 1,
            "IsErroredOnProcessing": false,
            "ProcessingTimeInMilliseconds": "312"
        }"#;
        let response = OcrSpaceResponse::from_json(body).unwrap();
        assert_eq!(response.ocr_exit_code, Some(1));
        assert_eq!(response.text().unwrap(), "RM 7.00\r\nReference No. AB1\r\n");
        assert_eq!(response.into_text().unwrap(), "RM 7.00\r\nReference No. AB1\r\n");
    }

    #[test]
    fn test_error_list_is_reported() {
        let body = r#"{
            "OCRExitCode": 99,
            "IsErroredOnProcessing": true,
            "ErrorMessage": ["File failed validation.", "Invalid file type"]
        }"#;
        let response = OcrSpaceResponse::from_json(body).unwrap();
        assert!(response.is_errored_on_processing);
        match response.into_text() {
            Err(OcrError::NoText(message)) => {
                assert_eq!(message, "File failed validation.; Invalid file type")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_single_error_message() {
        let body = r#"{"OCRExitCode": 3, "IsErroredOnProcessing": true, "ErrorMessage": "Timed out"}"#;
        let response = OcrSpaceResponse::from_json(body).unwrap();
        assert!(matches!(response.text(), Err(OcrError::NoText(m)) if m == "Timed out"));
    }

    #[test]
    fn test_missing_results_without_message() {
        let response = OcrSpaceResponse::from_json(r#"{"OCRExitCode": 4}"#).unwrap();
        assert_eq!(response.error_summary(), "exit code 4");
    }

    #[test]
    fn test_invalid_body() {
        assert!(matches!(
            OcrSpaceResponse::from_json("<html>"),
            Err(OcrError::Request(_))
        ));
    }

    #[test]
    fn test_form_fields() {
        let config = OcrConfig::default();
        let fields = form_fields(&config, "key");
        assert_eq!(
            fields,
            vec![
                ("apikey", "key".to_string()),
                ("language", "eng".to_string()),
                ("isOverlayRequired", "false".to_string()),
            ]
        );
    }
}
