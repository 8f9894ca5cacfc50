//! Messaging backend abstraction.

use std::convert::Infallible;
use std::path::Path;

use async_trait::async_trait;
use tracing::info;

/// Capability the uploader needs from a chat client.
///
/// Authentication happens when the concrete backend is built, so an
/// implementation handed to the uploader is already signed in.
#[async_trait]
pub trait MessagingBackend: Send + Sync {
    /// Resolved chat partner.
    type Contact: Send + Sync;

    /// Error returned by every remote operation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resolves a public handle (without the leading `@`) to a contact.
    async fn resolve_contact(&self, handle: &str) -> Result<Self::Contact, Self::Error>;

    /// Sends a plain text message.
    async fn send_text(&self, contact: &Self::Contact, text: &str) -> Result<(), Self::Error>;

    /// Uploads a file and sends it with a caption.
    async fn send_file(
        &self,
        contact: &Self::Contact,
        path: &Path,
        caption: &str,
    ) -> Result<(), Self::Error>;

    /// Releases the connection.
    async fn close(&self);
}

/// Backend that only logs what would be sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunBackend;

#[async_trait]
impl MessagingBackend for DryRunBackend {
    type Contact = String;
    type Error = Infallible;

    async fn resolve_contact(&self, handle: &str) -> Result<String, Infallible> {
        info!("[dry-run] resolve @{}", handle);
        Ok(handle.to_owned())
    }

    async fn send_text(&self, contact: &String, text: &str) -> Result<(), Infallible> {
        info!("[dry-run] -> @{}: {}", contact, text);
        Ok(())
    }

    async fn send_file(&self, contact: &String, path: &Path, caption: &str) -> Result<(), Infallible> {
        info!("[dry-run] -> @{}: file {} ({})", contact, path.display(), caption);
        Ok(())
    }

    async fn close(&self) {
        info!("[dry-run] close");
    }
}
