//! The scripted `@Stickers` conversation.
//!
//! There is no branching on the bot's replies: every step is either an
//! outgoing message or a fixed pause, and the "state" of the conversation
//! is simply the position in the step list. Each step carries a
//! [`Checkpoint`] so logs and errors can name where the remote dialogue
//! stopped.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{CONFIRM_TOKEN, NEW_PACK_COMMAND, PUBLISH_COMMAND, SKIP_COMMAND};
use crate::config::{PackManifest, UploadSettings};

/// Position in the conversation with the sticker bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// `/newpack` sent.
    NewPack,
    /// Pack title sent.
    Title,
    /// Pack short name sent.
    ShortName,
    /// Short name sent again as the "belongs to" answer.
    PackOwner,
    /// Sticker at the given manifest index.
    Sticker(usize),
    /// `/publish` sent.
    Publish,
    /// Publish confirmed.
    Confirm,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewPack => f.write_str("new pack"),
            Self::Title => f.write_str("title"),
            Self::ShortName => f.write_str("short name"),
            Self::PackOwner => f.write_str("pack owner"),
            Self::Sticker(index) => write!(f, "sticker #{}", index + 1),
            Self::Publish => f.write_str("publish"),
            Self::Confirm => f.write_str("confirm"),
        }
    }
}

/// What a single step does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send a text message.
    SendText(String),
    /// Upload a file with a caption.
    SendFile { path: PathBuf, caption: String },
    /// Wait before the next step.
    Pause(Duration),
}

/// One step of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub checkpoint: Checkpoint,
    pub action: Action,
}

impl ScriptStep {
    fn text(checkpoint: Checkpoint, text: &str) -> Self {
        Self {
            checkpoint,
            action: Action::SendText(text.to_owned()),
        }
    }

    fn pause(checkpoint: Checkpoint, duration: Duration) -> Self {
        Self {
            checkpoint,
            action: Action::Pause(duration),
        }
    }
}

/// Builds the full conversation for a manifest.
///
/// Sticker paths are resolved against `base_dir`, the directory holding
/// the manifest.
#[must_use]
pub fn build_script(
    manifest: &PackManifest,
    base_dir: &Path,
    timing: &UploadSettings,
) -> Vec<ScriptStep> {
    let step = timing.step_delay();
    let mut steps = Vec::with_capacity(8 + manifest.len() * 5 + 3);

    for (checkpoint, text) in [
        (Checkpoint::NewPack, NEW_PACK_COMMAND),
        (Checkpoint::Title, manifest.title.as_str()),
        (Checkpoint::ShortName, manifest.short_name.as_str()),
        (Checkpoint::PackOwner, manifest.short_name.as_str()),
    ] {
        steps.push(ScriptStep::text(checkpoint, text));
        steps.push(ScriptStep::pause(checkpoint, step));
    }

    for (index, sticker) in manifest.stickers.iter().enumerate() {
        let checkpoint = Checkpoint::Sticker(index);
        steps.push(ScriptStep {
            checkpoint,
            action: Action::SendFile {
                path: base_dir.join(&sticker.webp),
                caption: sticker.emoji.clone(),
            },
        });
        steps.push(ScriptStep::pause(checkpoint, timing.processing_delay()));
        steps.push(ScriptStep::pause(checkpoint, step));
        steps.push(ScriptStep::text(checkpoint, SKIP_COMMAND));
        steps.push(ScriptStep::pause(checkpoint, step));
    }

    steps.push(ScriptStep::text(Checkpoint::Publish, PUBLISH_COMMAND));
    steps.push(ScriptStep::pause(Checkpoint::Publish, step));
    steps.push(ScriptStep::text(Checkpoint::Confirm, CONFIRM_TOKEN));

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StickerEntry;

    fn manifest() -> PackManifest {
        let mut manifest = PackManifest::with_defaults(vec![
            StickerEntry::new("a.png".into(), "a.webp".into(), "🔥".into()),
            StickerEntry::new("b.png".into(), "b.webp".into(), "🐱".into()),
        ]);
        manifest.title = "Cats".to_owned();
        manifest.short_name = "cats_pack".to_owned();
        manifest
    }

    fn sent_texts(steps: &[ScriptStep]) -> Vec<&str> {
        steps
            .iter()
            .filter_map(|s| match &s.action {
                Action::SendText(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_message_order() {
        let steps = build_script(&manifest(), Path::new("out"), &UploadSettings::default());
        assert_eq!(
            sent_texts(&steps),
            [
                "/newpack",
                "Cats",
                "cats_pack",
                "cats_pack",
                "/skip",
                "/skip",
                "/publish",
                "Yes"
            ]
        );
    }

    #[test]
    fn test_sticker_steps() {
        let timing = UploadSettings {
            step_delay_ms: 10,
            processing_delay_ms: 20,
        };
        let steps = build_script(&manifest(), Path::new("out"), &timing);

        let sticker: Vec<&ScriptStep> = steps
            .iter()
            .filter(|s| s.checkpoint == Checkpoint::Sticker(1))
            .collect();
        assert_eq!(sticker.len(), 5);
        assert_eq!(
            sticker[0].action,
            Action::SendFile {
                path: Path::new("out").join("b.webp"),
                caption: "🐱".to_owned(),
            }
        );
        assert_eq!(sticker[1].action, Action::Pause(Duration::from_millis(20)));
        assert_eq!(sticker[2].action, Action::Pause(Duration::from_millis(10)));
        assert_eq!(sticker[3].action, Action::SendText("/skip".to_owned()));
        assert_eq!(sticker[4].action, Action::Pause(Duration::from_millis(10)));
    }

    #[test]
    fn test_script_ends_with_confirmation() {
        let steps = build_script(&manifest(), Path::new("out"), &UploadSettings::default());
        let last = steps.last().unwrap();
        assert_eq!(last.checkpoint, Checkpoint::Confirm);
        assert_eq!(last.action, Action::SendText("Yes".to_owned()));
        assert_eq!(steps.len(), 8 + 2 * 5 + 3);
    }

    #[test]
    fn test_checkpoint_display() {
        assert_eq!(Checkpoint::Sticker(0).to_string(), "sticker #1");
        assert_eq!(Checkpoint::PackOwner.to_string(), "pack owner");
    }
}
