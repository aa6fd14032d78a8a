//! Shape, format and size normalization.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgba, RgbaImage};

use crate::error::{PipelineError, Result};
use crate::fetch::ImageFetcher;

/// Square side lengths the image provider accepts, ascending.
pub const ACCEPTED_SIDES: [u32; 3] = [256, 512, 1024];

/// Largest encoded image the provider accepts (4 MiB).
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// An image ready to forward, with its matching mask.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// PNG image bytes.
    pub image: Vec<u8>,
    /// Fully transparent PNG with the same dimensions as `image`.
    pub mask: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Download an image and normalize it.
pub async fn fetch_and_normalize(
    fetcher: &dyn ImageFetcher,
    url: &str,
) -> Result<NormalizedImage> {
    let raw = fetcher.fetch(url).await?;
    tracing::info!("Downloaded image ({} bytes)", raw.len());
    normalize(&raw)
}

/// Normalize raw image bytes into an acceptable PNG plus mask.
///
/// Images that are already square PNGs of an accepted side are forwarded
/// byte for byte. Anything else is resized and/or re-encoded. Non-square
/// images keep their aspect ratio, so the result may not be square.
pub fn normalize(raw: &[u8]) -> Result<NormalizedImage> {
    let reader = ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode(e.to_string()))?;
    let format = reader.format();
    let img = reader
        .decode()
        .map_err(|e| PipelineError::Decode(e.to_string()))?;

    let (width, height) = img.dimensions();
    tracing::debug!("Decoded image {}x{} ({:?})", width, height, format);

    let mut resized = false;
    let img = if width != height || !ACCEPTED_SIDES.contains(&width) {
        let side = target_side(width).ok_or(PipelineError::NoSmallerSize { width })?;
        let (new_width, new_height) = scaled_dimensions(width, height, side);
        tracing::info!(
            "Resizing image {}x{} -> {}x{}",
            width,
            height,
            new_width,
            new_height
        );
        resized = true;
        img.resize_exact(new_width, new_height, FilterType::Lanczos3)
    } else {
        img
    };

    let (image, img) = if resized || format != Some(ImageFormat::Png) {
        tracing::info!("Converting image to PNG");
        let png = encode_png(&with_png_color(img)).map_err(PipelineError::Encode)?;
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .map_err(|e| PipelineError::Encode(e.to_string()))?;
        (png, decoded)
    } else {
        (raw.to_vec(), img)
    };

    if image.len() > MAX_IMAGE_BYTES {
        return Err(PipelineError::TooLarge { size: image.len() });
    }

    let (width, height) = img.dimensions();
    let mask = transparent_mask(width, height)?;

    Ok(NormalizedImage {
        image,
        mask,
        width,
        height,
    })
}

/// The largest accepted side strictly smaller than `width`.
pub fn target_side(width: u32) -> Option<u32> {
    ACCEPTED_SIDES
        .iter()
        .rev()
        .copied()
        .find(|&side| side < width)
}

/// Scale the longer side to `side` and the shorter one proportionally,
/// truncating.
pub fn scaled_dimensions(width: u32, height: u32, side: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| -> u32 {
        let scaled = u64::from(short) * u64::from(side) / u64::from(long.max(1));
        (scaled as u32).max(1)
    };

    if width >= height {
        (side, scale(height, width))
    } else {
        (scale(width, height), side)
    }
}

fn with_png_color(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgba8(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma8(_) => {
            img
        }
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    }
}

fn encode_png(img: &DynamicImage) -> std::result::Result<Vec<u8>, String> {
    let mut output = Cursor::new(Vec::new());
    img.write_to(&mut output, ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(output.into_inner())
}

fn transparent_mask(width: u32, height: u32) -> Result<Vec<u8>> {
    let mask = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    encode_png(&DynamicImage::ImageRgba8(mask)).map_err(PipelineError::MaskEncode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{RgbImage, Rgb};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn encoded(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut output = Cursor::new(Vec::new());
        img.write_to(&mut output, format).unwrap();
        output.into_inner()
    }

    fn solid_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 90])))
    }

    #[test]
    fn test_target_side() {
        assert_eq!(target_side(2000), Some(1024));
        assert_eq!(target_side(1024), Some(512));
        assert_eq!(target_side(300), Some(256));
        assert_eq!(target_side(256), None);
        assert_eq!(target_side(100), None);
    }

    #[test]
    fn test_scaled_dimensions_truncates() {
        assert_eq!(scaled_dimensions(2000, 1000, 1024), (1024, 512));
        assert_eq!(scaled_dimensions(1000, 3000, 512), (170, 512));
        assert_eq!(scaled_dimensions(600, 600, 512), (512, 512));
    }

    #[test]
    fn test_wide_jpeg_is_resized_and_masked() {
        let raw = encoded(solid_rgb(2000, 1000), ImageFormat::Jpeg);

        let normalized = normalize(&raw).unwrap();
        assert_eq!((normalized.width, normalized.height), (1024, 512));
        assert!(normalized.image.starts_with(&PNG_SIGNATURE));

        let image = image::load_from_memory(&normalized.image).unwrap();
        assert_eq!(image.dimensions(), (1024, 512));

        let mask = image::load_from_memory(&normalized.mask).unwrap().to_rgba8();
        assert_eq!(mask.dimensions(), (1024, 512));
        assert!(mask.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_target_sized_jpeg_is_reencoded_without_resizing() {
        let raw = encoded(solid_rgb(512, 512), ImageFormat::Jpeg);

        let normalized = normalize(&raw).unwrap();
        assert_eq!((normalized.width, normalized.height), (512, 512));
        assert!(normalized.image.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_acceptable_png_is_forwarded_untouched() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(256, 256, Rgba([1, 2, 3, 255])));
        let raw = encoded(img, ImageFormat::Png);

        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.image, raw);
        assert_eq!((normalized.width, normalized.height), (256, 256));
    }

    #[test]
    fn test_resized_png_is_reencoded() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(600, 600, Rgba([1, 2, 3, 255])));
        let raw = encoded(img, ImageFormat::Png);

        let normalized = normalize(&raw).unwrap();
        assert_eq!((normalized.width, normalized.height), (512, 512));
        let image = image::load_from_memory(&normalized.image).unwrap();
        assert_eq!(image.dimensions(), (512, 512));
    }

    #[test]
    fn test_small_image_has_no_smaller_size() {
        let raw = encoded(solid_rgb(200, 200), ImageFormat::Png);
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, PipelineError::NoSmallerSize { width: 200 }));
    }

    #[test]
    fn test_gif_is_decoded_and_converted() {
        let raw = encoded(solid_rgb(300, 300), ImageFormat::Gif);

        let normalized = normalize(&raw).unwrap();
        assert_eq!((normalized.width, normalized.height), (256, 256));
        assert!(normalized.image.starts_with(&PNG_SIGNATURE));
    }

    #[test]
    fn test_tiny_gif_reaches_resize_step() {
        let raw = encoded(solid_rgb(1, 1), ImageFormat::Gif);
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, PipelineError::NoSmallerSize { width: 1 }));
    }

    #[test]
    fn test_target_sized_webp_is_reencoded_as_png() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(256, 256, Rgba([9, 8, 7, 255])));
        let raw = encoded(img, ImageFormat::WebP);

        let normalized = normalize(&raw).unwrap();
        assert_eq!((normalized.width, normalized.height), (256, 256));
        assert!(normalized.image.starts_with(&PNG_SIGNATURE));
        assert_ne!(normalized.image, raw);
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let err = normalize(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn test_incompressible_png_is_too_large() {
        // xorshift noise defeats PNG compression: 1024*1024*4 bytes of pixels
        let mut state: u32 = 0x9E37_79B9;
        let mut pixels = Vec::with_capacity(1024 * 1024 * 4);
        for _ in 0..1024 * 1024 * 4 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            pixels.push((state >> 24) as u8);
        }
        let img = RgbaImage::from_raw(1024, 1024, pixels).unwrap();
        let raw = encoded(DynamicImage::ImageRgba8(img), ImageFormat::Png);
        assert!(raw.len() > MAX_IMAGE_BYTES);

        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, PipelineError::TooLarge { size } if size == raw.len()));
    }

    struct FailingFetcher;

    #[async_trait]
    impl ImageFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Err(PipelineError::Fetch("404 Not Found".to_string()))
        }
    }

    struct StaticFetcher(Vec<u8>);

    #[async_trait]
    impl ImageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let err = fetch_and_normalize(&FailingFetcher, "https://example.com/x.png")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error downloading image: 404 Not Found");
    }

    #[tokio::test]
    async fn test_fetch_and_normalize() {
        let fetcher = StaticFetcher(encoded(solid_rgb(1024, 1024), ImageFormat::Jpeg));
        let normalized = fetch_and_normalize(&fetcher, "https://example.com/x.jpg")
            .await
            .unwrap();
        assert_eq!((normalized.width, normalized.height), (1024, 1024));
    }
}
