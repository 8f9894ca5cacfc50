//! Batch conversion followed by manifest generation.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::{ConversionReport, process_directory};
use crate::config::{DEFAULT_EMOJI, MANIFEST_FILE_NAME, ManifestError, PackManifest};

/// Errors that stop preparation entirely.
#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Failed to scan images: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write manifest: {0}")]
    Manifest(#[from] ManifestError),
}

/// Overrides applied to the generated manifest.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    pub title: Option<String>,
    pub short_name: Option<String>,
    pub emoji: String,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            title: None,
            short_name: None,
            emoji: DEFAULT_EMOJI.to_owned(),
        }
    }
}

/// Result of a preparation run.
#[derive(Debug)]
pub enum PrepareOutcome {
    /// No image could be converted; no manifest was written.
    NothingToDo(ConversionReport),

    /// Manifest written to `path`.
    Written {
        path: PathBuf,
        manifest: PackManifest,
        report: ConversionReport,
    },
}

/// Converts `input_dir` into `output_dir` and writes `sticker_config.json`.
pub fn prepare_pack(
    input_dir: &Path,
    output_dir: &Path,
    options: PrepareOptions,
) -> Result<PrepareOutcome, PrepareError> {
    let report = process_directory(input_dir, output_dir, &options.emoji)?;
    if report.is_empty() {
        return Ok(PrepareOutcome::NothingToDo(report));
    }

    let mut manifest = PackManifest::with_defaults(report.stickers.clone());
    if let Some(title) = options.title {
        manifest.title = title;
    }
    if let Some(short_name) = options.short_name {
        manifest.short_name = short_name;
    }
    manifest.validate()?;

    let path = output_dir.join(MANIFEST_FILE_NAME);
    manifest.save_to_file(&path)?;
    info!("Manifest written to {}", path.display());

    Ok(PrepareOutcome::Written {
        path,
        manifest,
        report,
    })
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgb};

    use super::*;

    fn write_image(path: &Path, width: u32, height: u32) {
        ImageBuffer::from_pixel(width, height, Rgb::<u8>([90, 90, 90]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_no_images_writes_no_manifest() {
        let input = tempfile::tempdir().unwrap();
        let output = input.path().join("out");
        std::fs::write(input.path().join("readme.txt"), b"hi").unwrap();

        let outcome = prepare_pack(input.path(), &output, PrepareOptions::default()).unwrap();
        assert!(matches!(outcome, PrepareOutcome::NothingToDo(_)));
        assert!(!output.join(MANIFEST_FILE_NAME).exists());
    }

    #[test]
    fn test_all_failed_writes_no_manifest() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("x.png"), b"nope").unwrap();

        let outcome = prepare_pack(input.path(), output.path(), PrepareOptions::default()).unwrap();
        let PrepareOutcome::NothingToDo(report) = outcome else {
            panic!("expected nothing to do");
        };
        assert_eq!(report.failed.len(), 1);
        assert!(!output.path().join(MANIFEST_FILE_NAME).exists());
    }

    #[test]
    fn test_manifest_matches_converted_files() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_image(&input.path().join("a.png"), 300, 300);
        write_image(&input.path().join("b.jpg"), 800, 400);
        std::fs::write(input.path().join("c.png"), b"broken").unwrap();

        let outcome = prepare_pack(input.path(), output.path(), PrepareOptions::default()).unwrap();
        let PrepareOutcome::Written { path, manifest, report } = outcome else {
            panic!("expected a manifest");
        };

        assert_eq!(report.failed.len(), 1);
        assert_eq!(manifest.len(), 2);
        for sticker in &manifest.stickers {
            assert!(output.path().join(&sticker.webp).is_file());
            assert_eq!(sticker.emoji, DEFAULT_EMOJI);
        }

        let loaded = PackManifest::load_from_file(&path).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.title, "My Awesome Stickers");
        assert_eq!(loaded.short_name, "my_awesome_stickers");
    }

    #[test]
    fn test_overrides_applied() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_image(&input.path().join("a.png"), 16, 16);

        let options = PrepareOptions {
            title: Some("Grey Squares".to_owned()),
            short_name: Some("grey_squares".to_owned()),
            emoji: "⬜".to_owned(),
        };
        let PrepareOutcome::Written { manifest, .. } =
            prepare_pack(input.path(), output.path(), options).unwrap()
        else {
            panic!("expected a manifest");
        };
        assert_eq!(manifest.title, "Grey Squares");
        assert_eq!(manifest.short_name, "grey_squares");
        assert_eq!(manifest.stickers[0].emoji, "⬜");
    }

    #[test]
    fn test_invalid_short_name_override_is_rejected() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_image(&input.path().join("a.png"), 16, 16);

        let options = PrepareOptions {
            short_name: Some("has spaces".to_owned()),
            ..PrepareOptions::default()
        };
        let err = prepare_pack(input.path(), output.path(), options).unwrap_err();
        assert!(matches!(
            err,
            PrepareError::Manifest(ManifestError::InvalidShortName(_))
        ));
        assert!(!output.path().join(MANIFEST_FILE_NAME).exists());
    }
}
