//! Single-image conversion: decode, shrink-to-fit, pad, encode.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::config::StickerEntry;

/// Width and height of every sticker canvas.
pub const STICKER_SIZE: u32 = 512;

/// Lossy WebP quality used for stickers.
pub const WEBP_QUALITY: f32 = 90.0;

/// Errors that can occur while converting a single image.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("File name is not valid UTF-8: {0}")]
    InvalidFileName(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode WebP: {0}")]
    Encode(String),
}

/// Computes the size of an image shrunk to fit a `max`×`max` box.
///
/// Aspect ratio is preserved and images already inside the box are
/// returned unchanged. Each side is rounded to the nearest pixel and
/// never drops below 1.
#[must_use]
pub fn fit_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let longest = u64::from(width.max(height));
    let scale = |side: u32| {
        let scaled = (u64::from(side) * u64::from(max) + longest / 2) / longest;
        u32::try_from(scaled).unwrap_or(max).clamp(1, max)
    };

    (scale(width), scale(height))
}

/// Offset that centers a `width`×`height` image on the sticker canvas.
#[must_use]
pub const fn center_offset(width: u32, height: u32) -> (u32, u32) {
    (
        STICKER_SIZE.saturating_sub(width) / 2,
        STICKER_SIZE.saturating_sub(height) / 2,
    )
}

/// Normalizes an image onto a transparent 512×512 RGBA canvas.
#[must_use]
pub fn normalize(image: &DynamicImage) -> RgbaImage {
    let rgba = image.to_rgba8();
    let (width, height) = fit_dimensions(rgba.width(), rgba.height(), STICKER_SIZE);

    let content = if (width, height) == rgba.dimensions() {
        rgba
    } else {
        debug!(
            "Resizing {}x{} -> {}x{}",
            rgba.width(),
            rgba.height(),
            width,
            height
        );
        imageops::resize(&rgba, width, height, FilterType::Lanczos3)
    };

    let mut canvas = RgbaImage::from_pixel(STICKER_SIZE, STICKER_SIZE, Rgba([0, 0, 0, 0]));
    let (x, y) = center_offset(width, height);
    imageops::replace(&mut canvas, &content, i64::from(x), i64::from(y));
    canvas
}

/// Encodes an RGBA image as lossy WebP.
pub fn encode_webp(image: &RgbaImage) -> Result<Vec<u8>, ConvertError> {
    let encoder = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height());
    let memory = encoder
        .encode_simple(false, WEBP_QUALITY)
        .map_err(|e| ConvertError::Encode(format!("{e:?}")))?;
    Ok(memory.to_vec())
}

/// Converts one source image into `<output_dir>/<stem>.webp`.
pub fn convert_file(
    input: &Path,
    output_dir: &Path,
    emoji: &str,
) -> Result<StickerEntry, ConvertError> {
    let (Some(original), Some(stem)) = (
        input.file_name().and_then(|n| n.to_str()),
        input.file_stem().and_then(|n| n.to_str()),
    ) else {
        return Err(ConvertError::InvalidFileName(input.to_path_buf()));
    };

    let decoded = ImageReader::open(input)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|source| ConvertError::Io {
            path: input.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|source| ConvertError::Decode {
            path: input.to_path_buf(),
            source,
        })?;

    let encoded = encode_webp(&normalize(&decoded))?;

    let webp_name = format!("{stem}.webp");
    let output = output_dir.join(&webp_name);
    std::fs::write(&output, encoded).map_err(|source| ConvertError::Io {
        path: output.clone(),
        source,
    })?;

    Ok(StickerEntry::new(original.to_owned(), webp_name, emoji.to_owned()))
}
