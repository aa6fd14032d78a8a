//! Image normalization for image-generation providers.
//!
//! Providers only accept square PNG images with a side of 256, 512 or 1024
//! pixels, no larger than 4 MiB, paired with a mask of the same dimensions.
//! [`normalize`] turns arbitrary user-supplied bytes into that shape or
//! explains, in a sentence that can be texted back, why it could not.
//!
//! ```no_run
//! use image_pipeline::{fetch_and_normalize, HttpImageFetcher};
//!
//! # async fn example() -> Result<(), image_pipeline::PipelineError> {
//! let fetcher = HttpImageFetcher::new();
//! let normalized = fetch_and_normalize(&fetcher, "https://example.com/cat.jpg").await?;
//! println!("{}x{}", normalized.width, normalized.height);
//! # Ok(())
//! # }
//! ```

mod error;
mod fetch;
mod normalize;

pub use error::{PipelineError, Result};
pub use fetch::{HttpImageFetcher, ImageFetcher};
pub use normalize::{
    fetch_and_normalize, normalize, scaled_dimensions, target_side, NormalizedImage,
    ACCEPTED_SIDES, MAX_IMAGE_BYTES,
};
