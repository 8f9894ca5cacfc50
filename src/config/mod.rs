//! Configuration module for the sticker pack builder.
//!
//! Handles the pack manifest shared by both stages and the
//! environment-supplied Telegram credentials and timing settings.

mod manifest;
mod settings;

pub use manifest::{ManifestError, PackManifest, StickerEntry, is_valid_short_name};
pub use settings::{ConfigError, TelegramConfig, UploadSettings};

/// File name of the manifest written into the output directory.
pub const MANIFEST_FILE_NAME: &str = "sticker_config.json";

/// Title written into a freshly generated manifest.
pub const DEFAULT_TITLE: &str = "My Awesome Stickers";

/// Short name written into a freshly generated manifest.
pub const DEFAULT_SHORT_NAME: &str = "my_awesome_stickers";

/// Emoji attached to every sticker until the user edits the manifest.
pub const DEFAULT_EMOJI: &str = "😀";

/// Maximum length of a sticker pack short name.
pub const MAX_SHORT_NAME_LENGTH: usize = 64;
