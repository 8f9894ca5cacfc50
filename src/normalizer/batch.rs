//! Directory scanning and batch conversion.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{SUPPORTED_EXTENSIONS, convert_file};
use crate::config::StickerEntry;

/// An image that could not be turned into a sticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedImage {
    /// File name of the source image.
    pub file: String,

    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of converting a whole input directory.
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Successfully converted stickers, in discovery order.
    pub stickers: Vec<StickerEntry>,

    /// Images that were skipped.
    pub failed: Vec<FailedImage>,
}

impl ConversionReport {
    /// True when no sticker was produced, which means there is nothing to do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}

/// Lists source images directly inside `dir`, sorted by file name.
pub fn discover_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            });

        if supported {
            images.push(path);
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Converts every source image in `input_dir` into `output_dir`.
///
/// A failing image is logged and recorded in the report; it never stops
/// the rest of the batch. Two sources sharing a stem (`a.png`, `a.jpg`)
/// would overwrite each other's WebP, so once one of them has been
/// converted the later one is skipped.
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    emoji: &str,
) -> std::io::Result<ConversionReport> {
    std::fs::create_dir_all(output_dir)?;

    let images = discover_images(input_dir)?;
    info!("Found {} image(s) in {}", images.len(), input_dir.display());

    let mut report = ConversionReport::default();
    let mut written = HashSet::new();

    for path in images {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if written.contains(&stem) {
            warn!("Skipping {}: {}.webp was already produced by another image", file, stem);
            report.failed.push(FailedImage {
                file,
                reason: format!("duplicate output name {stem}.webp"),
            });
            continue;
        }

        match convert_file(&path, output_dir, emoji) {
            Ok(entry) => {
                info!("Processed {} -> {}", entry.original, entry.webp);
                written.insert(stem);
                report.stickers.push(entry);
            }
            Err(e) => {
                warn!("Error converting {}: {}", file, e);
                report.failed.push(FailedImage {
                    file,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}
