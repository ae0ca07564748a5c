//! Checks applied to receipt images before they are sent for recognition.

use image::ImageFormat;
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
}

impl UploadFormat {
    /// File name sent with the multipart `file` part.
    pub fn file_name(&self) -> &'static str {
        match self {
            UploadFormat::Jpeg => "image.jpg",
            UploadFormat::Png => "image.png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            UploadFormat::Jpeg => "image/jpeg",
            UploadFormat::Png => "image/png",
        }
    }
}

/// Size and type limits for uploaded receipt images.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    max_kb: u64,
}

impl UploadPolicy {
    pub fn new(max_kb: u64) -> Self {
        Self { max_kb }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(config.max_upload_kb)
    }

    /// Check an image, returning its format when it is acceptable.
    ///
    /// The format is sniffed from the content, not the file name.
    pub fn check(&self, bytes: &[u8]) -> Result<UploadFormat, OcrError> {
        let size_kb = (bytes.len() as u64).div_ceil(1024);
        if size_kb > self.max_kb {
            return Err(OcrError::TooLarge {
                size_kb,
                limit_kb: self.max_kb,
            });
        }

        let format = image::guess_format(bytes)
            .map_err(|_| OcrError::UnsupportedImage("unrecognized image data".to_string()))?;

        debug!("Upload sniffed as {:?}, {} KB", format, size_kb);

        match format {
            ImageFormat::Jpeg => Ok(UploadFormat::Jpeg),
            ImageFormat::Png => Ok(UploadFormat::Png),
            other => Err(OcrError::UnsupportedImage(format!(
                "{other:?} is not accepted, use JPEG or PNG"
            ))),
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_config(&OcrConfig::default())
    }
}
