//! Image normalization module.
//!
//! Turns arbitrary PNG/JPEG images into the 512×512 transparent-padded
//! WebP stickers that Telegram accepts, then records them in a manifest.

mod batch;
mod convert;
mod pack;

pub use batch::{ConversionReport, FailedImage, discover_images, process_directory};
pub use convert::{
    ConvertError, STICKER_SIZE, WEBP_QUALITY, center_offset, convert_file, encode_webp,
    fit_dimensions, normalize,
};
pub use pack::{PrepareError, PrepareOptions, PrepareOutcome, prepare_pack};

/// File extensions accepted as source images (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
