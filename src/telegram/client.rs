//! Telegram client wrapper for talking to the sticker bot.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use grammers_client::client::{LoginToken, PasswordToken};
use grammers_client::message::InputMessage;
use grammers_client::peer::Peer;
use grammers_client::{Client, InvocationError, SenderPool, SignInError, sender};
use grammers_session::storages::SqliteSession;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::uploader::MessagingBackend;

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Sign in failed: {0}")]
    SignInFailed(String),

    #[error("Password required for 2FA")]
    PasswordRequired(PasswordToken),

    #[error("Invalid password")]
    InvalidPassword(PasswordToken),

    #[error("No user or bot found for @{0}")]
    ContactNotFound(String),

    #[error("Failed to upload {0}")]
    Upload(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("API invocation error: {0}")]
    Invocation(String),
}

impl From<InvocationError> for TelegramError {
    fn from(err: InvocationError) -> Self {
        Self::Invocation(err.to_string())
    }
}

/// Signed-in Telegram user session.
///
/// Owned by a single upload; [`TelegramBot::disconnect`] ends it.
pub struct TelegramBot {
    /// The underlying grammers client.
    client: Client,

    /// Handle to the sender pool for disconnection.
    handle: sender::SenderPoolHandle,

    /// Background task running the sender pool.
    _pool_task: JoinHandle<()>,
}

impl TelegramBot {
    /// Connects to Telegram with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if connection fails.
    pub async fn connect(config: &TelegramConfig) -> Result<Self, TelegramError> {
        info!("Connecting to Telegram...");

        let session = Arc::new(
            SqliteSession::open(&config.session_path)
                .await
                .map_err(|e| TelegramError::Session(e.to_string()))?,
        );

        let SenderPool {
            runner,
            updates: _updates,
            handle,
        } = SenderPool::new(Arc::clone(&session), config.api_id);

        let client = Client::new(handle.clone());

        let pool_task = tokio::spawn(async move {
            runner.run().await;
        });

        let is_authorized = client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Connection(e.to_string()))?;

        info!("Connected to Telegram. Authorized: {}", is_authorized);

        Ok(Self {
            client,
            handle: handle.thin,
            _pool_task: pool_task,
        })
    }

    /// Checks if the client is authorized.
    ///
    /// # Errors
    ///
    /// Returns an error if the check fails.
    pub async fn is_authorized(&self) -> Result<bool, TelegramError> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Connection(e.to_string()))
    }

    /// Requests a login code to be sent to the phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn request_login_code(
        &self,
        phone: &str,
        api_hash: &str,
    ) -> Result<LoginToken, TelegramError> {
        info!("Requesting login code for phone: {}", mask_phone(phone));

        self.client
            .request_login_code(phone, api_hash)
            .await
            .map_err(|e| TelegramError::SignInFailed(e.to_string()))
    }

    /// Signs in with the login code.
    ///
    /// # Errors
    ///
    /// Returns an error if sign in fails.
    pub async fn sign_in(&self, token: &LoginToken, code: &str) -> Result<(), TelegramError> {
        info!("Signing in with login code...");

        match self.client.sign_in(token, code).await {
            Ok(_user) => {
                info!("Successfully signed in!");
                Ok(())
            }
            Err(SignInError::PasswordRequired(password_token)) => {
                debug!("2FA password required, hint: {:?}", password_token.hint());
                Err(TelegramError::PasswordRequired(password_token))
            }
            Err(SignInError::InvalidCode) => {
                Err(TelegramError::SignInFailed("Invalid code".to_owned()))
            }
            Err(e) => Err(TelegramError::SignInFailed(e.to_string())),
        }
    }

    /// Checks the 2FA password.
    ///
    /// # Errors
    ///
    /// Returns an error if the password is invalid.
    pub async fn check_password(
        &self,
        password_token: PasswordToken,
        password: &str,
    ) -> Result<(), TelegramError> {
        info!("Checking 2FA password...");

        match self.client.check_password(password_token, password).await {
            Ok(_user) => {
                info!("Successfully authenticated with 2FA!");
                Ok(())
            }
            Err(SignInError::InvalidPassword(token)) => Err(TelegramError::InvalidPassword(token)),
            Err(e) => Err(TelegramError::SignInFailed(e.to_string())),
        }
    }

    /// Resolves a public username (without `@`) to a peer.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody uses the handle or the lookup fails.
    pub async fn resolve_username(&self, handle: &str) -> Result<Peer, TelegramError> {
        debug!("Resolving @{}", handle);

        self.client
            .resolve_username(handle)
            .await?
            .ok_or_else(|| TelegramError::ContactNotFound(handle.to_owned()))
    }

    /// Sends a text message to a peer.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be delivered.
    pub async fn send_message(&self, peer: &Peer, text: &str) -> Result<(), TelegramError> {
        self.client.send_message(peer, text).await?;
        Ok(())
    }

    /// Uploads a file and sends it to a peer as a document with a caption.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload or the message fails.
    pub async fn send_document(
        &self,
        peer: &Peer,
        path: &Path,
        caption: &str,
    ) -> Result<(), TelegramError> {
        let uploaded = self
            .client
            .upload_file(path)
            .await
            .map_err(|e| TelegramError::Upload(format!("{}: {e}", path.display())))?;

        let message = InputMessage::from(caption).document(uploaded);
        self.client.send_message(peer, message).await?;
        Ok(())
    }

    /// Disconnects from Telegram.
    pub fn disconnect(&self) {
        info!("Disconnecting from Telegram...");
        self.handle.quit();
    }
}

#[async_trait]
impl MessagingBackend for TelegramBot {
    type Contact = Peer;
    type Error = TelegramError;

    async fn resolve_contact(&self, handle: &str) -> Result<Peer, TelegramError> {
        self.resolve_username(handle).await
    }

    async fn send_text(&self, contact: &Peer, text: &str) -> Result<(), TelegramError> {
        self.send_message(contact, text).await
    }

    async fn send_file(
        &self,
        contact: &Peer,
        path: &Path,
        caption: &str,
    ) -> Result<(), TelegramError> {
        self.send_document(contact, path, caption).await
    }

    async fn close(&self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot").finish_non_exhaustive()
    }
}

/// Masks a phone number for logging (shows last 4 digits).
fn mask_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() > 4 {
        format!("***{}", &digits[digits.len() - 4..])
    } else {
        "****".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("+1234567890"), "***7890");
        assert_eq!(mask_phone("123"), "****");
        assert_eq!(mask_phone("+7 (999) 123-45-67"), "***4567");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TelegramError::ContactNotFound("Stickers".to_owned()).to_string(),
            "No user or bot found for @Stickers"
        );
        assert_eq!(
            TelegramError::Invocation("FLOOD_WAIT_30".to_owned()).to_string(),
            "API invocation error: FLOOD_WAIT_30"
        );
    }
}
