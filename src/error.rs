//! Error types for split image loading and comparison

use std::path::PathBuf;
use thiserror::Error;

/// Result type for comparison operations
pub type Result<T> = std::result::Result<T, CompareError>;

/// Error type for split image loading and text recognition
///
/// None of these are fatal to a comparison loop: a split image that fails to
/// load keeps working, it just never matches.
#[derive(Debug, Error)]
pub enum CompareError {
    /// The payload could not be decoded to a usable image
    #[error("'{path}' is not a valid image file: {reason}")]
    ImageType { path: PathBuf, reason: String },

    /// Reading a file failed
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML file (settings or OCR text file) does not have the expected shape
    #[error("Invalid TOML in '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The OCR rectangle is invalid, a numeric option is negative, or no texts are configured
    #[error("Invalid OCR values in '{path}': {reason}")]
    InvalidOcrValues { path: PathBuf, reason: String },

    /// No text recognition engine is available
    #[error("Tesseract is required to use text files ('{path}') but it could not be found")]
    TesseractMissing { path: PathBuf },

    /// The text recognition engine was invoked but did not produce text
    #[error("Text recognition failed: {0}")]
    Recognition(String),

    /// Encoding a capture region for the recognition engine failed
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

impl CompareError {
    /// Create an image type error for a path
    pub fn image_type(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ImageType {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid OCR values error for a path
    pub fn invalid_ocr_values(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidOcrValues {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
