//! Executes the scripted conversation against a backend.
//!
//! The runner walks the step list in order:
//! 1. Validate the manifest (nothing is sent for an invalid one)
//! 2. Resolve the sticker bot
//! 3. Send each message or sleep for each pause
//! 4. A sticker whose WebP is missing is skipped with all of its steps
//! 5. The backend is closed on every exit path
//!
//! Remote failures are not retried: the first one aborts the run and the
//! error names the checkpoint that failed.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{Action, Checkpoint, MessagingBackend, STICKER_BOT_HANDLE, ScriptStep, build_script};
use crate::config::{ManifestError, PackManifest, UploadSettings};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid manifest: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Could not resolve @{handle}: {source}")]
    Resolve {
        handle: String,
        #[source]
        source: BoxError,
    },

    #[error("Step \"{checkpoint}\" failed: {source}")]
    Step {
        checkpoint: Checkpoint,
        #[source]
        source: BoxError,
    },
}

/// Outcome of a completed conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Short name of the created pack.
    pub short_name: String,

    /// WebP files that were sent.
    pub uploaded: Vec<String>,

    /// WebP files that were missing and skipped.
    pub skipped: Vec<String>,
}

impl UploadReport {
    /// Shareable link to the pack.
    #[must_use]
    pub fn pack_link(&self) -> String {
        format!("https://t.me/addstickers/{}", self.short_name)
    }

    /// One-line summary for the operator. A dry run never claims the pack
    /// exists.
    #[must_use]
    pub fn headline(&self, dry_run: bool) -> String {
        if dry_run {
            format!(
                "Dry run finished for {}: nothing was sent to Telegram",
                self.short_name
            )
        } else {
            format!("Sticker pack created: {}", self.short_name)
        }
    }
}

/// Drives the sticker bot through pack creation.
pub struct PackUploader<B: MessagingBackend> {
    /// Signed-in backend, owned for the duration of one upload.
    backend: B,

    /// Pauses between steps.
    timing: UploadSettings,
}

impl<B: MessagingBackend> PackUploader<B> {
    /// Creates a new uploader.
    #[must_use]
    pub const fn new(backend: B, timing: UploadSettings) -> Self {
        Self { backend, timing }
    }

    /// Creates the pack described by `manifest`.
    ///
    /// Sticker files are looked up relative to `base_dir`. The backend is
    /// closed before this returns, whether the run succeeded or not.
    pub async fn run(
        self,
        manifest: &PackManifest,
        base_dir: &Path,
    ) -> Result<UploadReport, UploadError> {
        let result = self.execute(manifest, base_dir).await;
        self.backend.close().await;
        result
    }

    async fn execute(
        &self,
        manifest: &PackManifest,
        base_dir: &Path,
    ) -> Result<UploadReport, UploadError> {
        manifest.validate()?;

        let contact = self
            .backend
            .resolve_contact(STICKER_BOT_HANDLE)
            .await
            .map_err(|e| UploadError::Resolve {
                handle: STICKER_BOT_HANDLE.to_owned(),
                source: Box::new(e),
            })?;

        info!(
            "Creating pack '{}' ({}) with {} sticker(s)",
            manifest.title,
            manifest.short_name,
            manifest.len()
        );

        let mut report = UploadReport {
            short_name: manifest.short_name.clone(),
            uploaded: Vec::new(),
            skipped: Vec::new(),
        };
        let mut skipping: Option<Checkpoint> = None;

        for step in build_script(manifest, base_dir, &self.timing) {
            if skipping == Some(step.checkpoint) {
                continue;
            }
            skipping = None;

            let ScriptStep { checkpoint, action } = step;
            match action {
                Action::SendText(text) => {
                    debug!("[{}] sending \"{}\"", checkpoint, text);
                    self.backend
                        .send_text(&contact, &text)
                        .await
                        .map_err(|e| step_error(checkpoint, e))?;
                }
                Action::SendFile { path, caption } => {
                    let name = display_name(&path);
                    if !path.is_file() {
                        warn!("Sticker file not found, skipping: {}", path.display());
                        report.skipped.push(name);
                        skipping = Some(checkpoint);
                        continue;
                    }

                    info!("[{}] uploading {} {}", checkpoint, name, caption);
                    self.backend
                        .send_file(&contact, &path, &caption)
                        .await
                        .map_err(|e| step_error(checkpoint, e))?;
                    report.uploaded.push(name);
                }
                Action::Pause(duration) => {
                    if !duration.is_zero() {
                        tokio::time::sleep(duration).await;
                    }
                }
            }
        }

        info!("Scripted conversation finished for pack {}", report.short_name);
        Ok(report)
    }
}

fn step_error<E>(checkpoint: Checkpoint, err: E) -> UploadError
where
    E: std::error::Error + Send + Sync + 'static,
{
    UploadError::Step {
        checkpoint,
        source: Box::new(err),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

impl<B: MessagingBackend> std::fmt::Debug for PackUploader<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackUploader")
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}
