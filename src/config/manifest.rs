//! Sticker pack manifest: loading, saving and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DEFAULT_SHORT_NAME, DEFAULT_TITLE, MAX_SHORT_NAME_LENGTH};

/// Errors that can occur while reading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Pack title is empty")]
    EmptyTitle,

    #[error("Pack short name is empty")]
    EmptyShortName,

    #[error("Invalid short name \"{0}\": use 1-64 ASCII letters, digits or single underscores, starting with a letter")]
    InvalidShortName(String),

    #[error("Manifest contains no stickers")]
    NoStickers,

    #[error("Sticker at index {index} ({webp}) has an empty emoji")]
    EmptyEmoji { index: usize, webp: String },

    #[error("Failed to read or write manifest file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse manifest file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A single converted sticker and the emoji it is registered with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StickerEntry {
    /// File name of the source image.
    pub original: String,

    /// File name of the converted WebP, relative to the manifest directory.
    pub webp: String,

    /// Emoji sent as the sticker caption.
    pub emoji: String,
}

impl StickerEntry {
    /// Creates a new sticker entry.
    #[must_use]
    pub const fn new(original: String, webp: String, emoji: String) -> Self {
        Self {
            original,
            webp,
            emoji,
        }
    }
}

/// Description of the sticker pack to create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackManifest {
    /// Human-readable pack title.
    pub title: String,

    /// Pack short name, used in the `t.me/addstickers/<short_name>` link.
    pub short_name: String,

    /// Stickers in upload order.
    pub stickers: Vec<StickerEntry>,
}

impl PackManifest {
    /// Creates a manifest with the placeholder title and short name.
    #[must_use]
    pub fn with_defaults(stickers: Vec<StickerEntry>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            short_name: DEFAULT_SHORT_NAME.to_owned(),
            stickers,
        }
    }

    /// Loads a manifest from a JSON file.
    ///
    /// A document missing any of `title`, `short_name` or `stickers`
    /// fails with [`ManifestError::ParseError`].
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        let manifest: Self = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    /// Saves the manifest as indented JSON with non-ASCII text unescaped.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        std::fs::write(path, self.to_pretty_json()?)?;
        Ok(())
    }

    /// Serializes the manifest with a four-space indent.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, ManifestError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Validates the manifest before any remote interaction.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.title.trim().is_empty() {
            return Err(ManifestError::EmptyTitle);
        }

        if self.short_name.is_empty() {
            return Err(ManifestError::EmptyShortName);
        }

        if !is_valid_short_name(&self.short_name) {
            return Err(ManifestError::InvalidShortName(self.short_name.clone()));
        }

        if self.stickers.is_empty() {
            return Err(ManifestError::NoStickers);
        }

        for (index, sticker) in self.stickers.iter().enumerate() {
            if sticker.emoji.trim().is_empty() {
                return Err(ManifestError::EmptyEmoji {
                    index,
                    webp: sticker.webp.clone(),
                });
            }
        }

        Ok(())
    }

    /// Returns the number of stickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    /// Checks if the manifest lists no stickers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}

/// Checks a sticker pack short name against Telegram's rules.
///
/// Letters, digits and underscores only, starting with a letter,
/// without consecutive underscores, at most 64 characters.
#[must_use]
pub fn is_valid_short_name(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };

    name.len() <= MAX_SHORT_NAME_LENGTH
        && first.is_ascii_alphabetic()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.contains("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EMOJI;

    fn sticker(name: &str, emoji: &str) -> StickerEntry {
        StickerEntry::new(
            format!("{name}.png"),
            format!("{name}.webp"),
            emoji.to_owned(),
        )
    }

    #[test]
    fn test_defaults() {
        let manifest = PackManifest::with_defaults(vec![sticker("a", DEFAULT_EMOJI)]);
        assert_eq!(manifest.title, "My Awesome Stickers");
        assert_eq!(manifest.short_name, "my_awesome_stickers");
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_validation_no_stickers() {
        let manifest = PackManifest::with_defaults(vec![]);
        assert!(matches!(manifest.validate(), Err(ManifestError::NoStickers)));
    }

    #[test]
    fn test_validation_empty_title() {
        let mut manifest = PackManifest::with_defaults(vec![sticker("a", "🔥")]);
        manifest.title = "   ".to_owned();
        assert!(matches!(manifest.validate(), Err(ManifestError::EmptyTitle)));
    }

    #[test]
    fn test_validation_empty_short_name() {
        let mut manifest = PackManifest::with_defaults(vec![sticker("a", "🔥")]);
        manifest.short_name = String::new();
        assert!(matches!(manifest.validate(), Err(ManifestError::EmptyShortName)));
    }

    #[test]
    fn test_validation_empty_emoji() {
        let manifest =
            PackManifest::with_defaults(vec![sticker("a", "🔥"), sticker("b", "")]);
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::EmptyEmoji { index: 1, .. })
        ));
    }

    #[test]
    fn test_short_name_rules() {
        assert!(is_valid_short_name("my_pack"));
        assert!(is_valid_short_name("Pack2024"));
        assert!(!is_valid_short_name(""));
        assert!(!is_valid_short_name("2pack"));
        assert!(!is_valid_short_name("_pack"));
        assert!(!is_valid_short_name("my__pack"));
        assert!(!is_valid_short_name("my-pack"));
        assert!(!is_valid_short_name("пак"));
        assert!(!is_valid_short_name(&"a".repeat(65)));
        assert!(is_valid_short_name(&"a".repeat(64)));
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sticker_config.json");
        std::fs::write(&path, r#"{"title": "T", "stickers": []}"#).unwrap();

        let err = PackManifest::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ManifestError::ParseError(_)));
    }

    #[test]
    fn test_round_trip_preserves_order_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sticker_config.json");

        let mut manifest = PackManifest::with_defaults(vec![
            sticker("zeta", "🦊"),
            sticker("alpha", "😀"),
            sticker("котик", "🐱"),
        ]);
        manifest.title = "Стикеры ✨".to_owned();
        manifest.save_to_file(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Стикеры ✨"));
        assert!(raw.contains("🦊"));
        assert!(raw.contains("\n    \"title\""));

        let loaded = PackManifest::load_from_file(&path).unwrap();
        assert_eq!(loaded, manifest);
    }
}
