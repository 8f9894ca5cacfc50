//! Pack uploader module.
//!
//! Replays the fixed `@Stickers` conversation that registers a new pack.
//! The conversation is a linear list of [`ScriptStep`]s executed by
//! [`PackUploader`] against any [`MessagingBackend`].

mod backend;
mod runner;
mod script;

pub use backend::{DryRunBackend, MessagingBackend};
pub use runner::{PackUploader, UploadError, UploadReport};
pub use script::{Action, Checkpoint, ScriptStep, build_script};

/// Public handle of Telegram's sticker bot.
pub const STICKER_BOT_HANDLE: &str = "Stickers";

/// Command that starts pack creation.
pub const NEW_PACK_COMMAND: &str = "/newpack";

/// Command that dismisses the optional per-sticker prompt.
pub const SKIP_COMMAND: &str = "/skip";

/// Command that publishes the pack.
pub const PUBLISH_COMMAND: &str = "/publish";

/// Answer to the publish confirmation prompt.
pub const CONFIRM_TOKEN: &str = "Yes";
