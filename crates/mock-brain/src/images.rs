//! Recording image generator.

use async_trait::async_trait;
use tokio::sync::Mutex;

use brain_core::{BrainError, ImageGenerator, ImageSize};

/// One recorded image request. Image buffers are kept whole so tests can
/// decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageCall {
    Create {
        prompt: String,
        size: ImageSize,
    },
    Edit {
        prompt: String,
        size: ImageSize,
        image: Vec<u8>,
        mask: Vec<u8>,
    },
    Variation {
        size: ImageSize,
        image: Vec<u8>,
    },
}

/// An image generator that answers every request with the same URL, or the
/// same failure.
#[derive(Debug)]
pub struct RecordingImageGenerator {
    outcome: Result<String, String>,
    calls: Mutex<Vec<ImageCall>>,
}

impl RecordingImageGenerator {
    /// Answer every request with `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            outcome: Ok(url.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with `BrainError::Unavailable(reason)`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far.
    pub async fn calls(&self) -> Vec<ImageCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: ImageCall) -> Result<String, BrainError> {
        self.calls.lock().await.push(call);
        self.outcome.clone().map_err(BrainError::Unavailable)
    }
}

#[async_trait]
impl ImageGenerator for RecordingImageGenerator {
    async fn create(&self, prompt: &str, size: ImageSize) -> Result<String, BrainError> {
        self.record(ImageCall::Create {
            prompt: prompt.to_string(),
            size,
        })
        .await
    }

    async fn edit(
        &self,
        prompt: &str,
        size: ImageSize,
        image: Vec<u8>,
        mask: Vec<u8>,
    ) -> Result<String, BrainError> {
        self.record(ImageCall::Edit {
            prompt: prompt.to_string(),
            size,
            image,
            mask,
        })
        .await
    }

    async fn variation(&self, image: Vec<u8>, size: ImageSize) -> Result<String, BrainError> {
        self.record(ImageCall::Variation { size, image }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_is_recorded() {
        let images = RecordingImageGenerator::new("https://img.example.com/1.png");
        let url = images.create("a cat", ImageSize::Medium).await.unwrap();

        assert_eq!(url, "https://img.example.com/1.png");
        assert_eq!(
            images.calls().await,
            vec![ImageCall::Create {
                prompt: "a cat".to_string(),
                size: ImageSize::Medium
            }]
        );
    }

    #[tokio::test]
    async fn test_unavailable() {
        let images = RecordingImageGenerator::unavailable("quota exceeded");
        let result = images.variation(vec![1, 2, 3], ImageSize::Small).await;
        assert!(matches!(result, Err(BrainError::Unavailable(reason)) if reason == "quota exceeded"));
        assert_eq!(images.calls().await.len(), 1);
    }
}
