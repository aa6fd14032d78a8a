//! Image-generation provider seam.

use std::fmt;

use async_trait::async_trait;

use crate::error::BrainError;

/// Output sizes the image provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl ImageSize {
    /// All sizes, in the order prompts are scanned for them.
    pub const ALL: [ImageSize; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Provider size token, e.g. `"512x512"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "256x256",
            Self::Medium => "512x512",
            Self::Large => "1024x1024",
        }
    }

    /// Side length in pixels.
    pub fn side(&self) -> u32 {
        match self {
            Self::Small => 256,
            Self::Medium => 512,
            Self::Large => 1024,
        }
    }

    /// Pull a size token out of a prompt.
    ///
    /// Returns the first size token found and the prompt with every occurrence
    /// of that token removed. Without a token the default size is returned and
    /// the prompt is left untouched.
    pub fn extract_from_prompt(prompt: &str) -> (ImageSize, String) {
        for size in Self::ALL {
            if prompt.contains(size.as_str()) {
                return (size, prompt.replace(size.as_str(), ""));
            }
        }
        (Self::default(), prompt.to_string())
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image-generation provider. Every call returns the URL of the result.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image from a prompt.
    async fn create(&self, prompt: &str, size: ImageSize) -> Result<String, BrainError>;

    /// Edit the transparent area of `mask` in `image` following the prompt.
    ///
    /// Both buffers must be PNG with identical dimensions.
    async fn edit(
        &self,
        prompt: &str,
        size: ImageSize,
        image: Vec<u8>,
        mask: Vec<u8>,
    ) -> Result<String, BrainError>;

    /// Generate a variation of a PNG image.
    async fn variation(&self, image: Vec<u8>, size: ImageSize) -> Result<String, BrainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_size_present() {
        let (size, prompt) = ImageSize::extract_from_prompt("a red fox 512x512 at dusk");
        assert_eq!(size, ImageSize::Medium);
        assert_eq!(prompt, "a red fox  at dusk");
    }

    #[test]
    fn test_extract_size_absent() {
        let (size, prompt) = ImageSize::extract_from_prompt("a red fox");
        assert_eq!(size, ImageSize::Small);
        assert_eq!(prompt, "a red fox");
    }

    #[test]
    fn test_extract_size_prefers_scan_order() {
        let (size, prompt) = ImageSize::extract_from_prompt("1024x1024 or 256x256");
        assert_eq!(size, ImageSize::Small);
        assert_eq!(prompt, "1024x1024 or ");
    }

    #[test]
    fn test_size_side() {
        assert_eq!(ImageSize::Large.side(), 1024);
        assert_eq!(ImageSize::Large.to_string(), "1024x1024");
    }
}
