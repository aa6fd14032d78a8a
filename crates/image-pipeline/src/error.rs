//! Pipeline error types.
//!
//! Every variant renders as a sentence suitable for texting back to the user.

use thiserror::Error;

use crate::normalize::MAX_IMAGE_BYTES;

/// Reasons an image could not be made acceptable.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The image could not be downloaded.
    #[error("Error downloading image: {0}")]
    Fetch(String),

    /// The bytes are not a readable image.
    #[error("Error processing image: {0}")]
    Decode(String),

    /// No accepted side is smaller than the current width.
    #[error("Error resizing image: {width}px wide is smaller than every accepted size (256, 512, 1024)")]
    NoSmallerSize { width: u32 },

    /// PNG conversion failed.
    #[error("Error converting image to PNG: {0}")]
    Encode(String),

    /// The encoded image exceeds the provider's byte budget.
    #[error("Image is too large ({size} bytes). Max size is 4MB ({max} bytes).", max = MAX_IMAGE_BYTES)]
    TooLarge { size: usize },

    /// The transparent mask could not be produced.
    #[error("Error creating image mask: {0}")]
    MaskEncode(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::Fetch(err.to_string())
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
