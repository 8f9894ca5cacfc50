//! Telegram credentials and upload timing settings.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Telegram API configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Telegram API ID (obtain from <https://my.telegram.org>).
    pub api_id: i32,

    /// Telegram API hash (obtain from <https://my.telegram.org>).
    pub api_hash: String,

    /// Phone number of the account that will own the pack.
    pub phone: String,

    /// Path to the session file.
    pub session_path: PathBuf,
}

fn default_session_path() -> PathBuf {
    PathBuf::from("session.db")
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub fn new(api_id: i32, api_hash: String, phone: String) -> Self {
        Self {
            api_id,
            api_hash,
            phone,
            session_path: default_session_path(),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `API_ID`, `API_HASH` and `PHONE` to be set.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingEnvVar(key))
        };

        let api_id: i32 = required("API_ID")?
            .parse()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ConfigError::InvalidApiId)?;

        let api_hash = required("API_HASH")?;
        let phone = required("PHONE")?;

        let session_path = lookup("TG_SESSION_PATH").map_or_else(default_session_path, PathBuf::from);

        Ok(Self {
            api_id,
            api_hash,
            phone,
            session_path,
        })
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .field("phone", &"<redacted>")
            .field("session_path", &self.session_path)
            .finish()
    }
}

/// Pauses between steps of the scripted conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSettings {
    /// Pause after every outgoing message, in milliseconds.
    pub step_delay_ms: u64,

    /// Pause after a sticker upload while the bot processes it, in milliseconds.
    pub processing_delay_ms: u64,
}

fn default_step_delay() -> u64 {
    1000
}

fn default_processing_delay() -> u64 {
    2000
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay(),
            processing_delay_ms: default_processing_delay(),
        }
    }
}

impl UploadSettings {
    /// Creates upload settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            step_delay_ms: lookup("STEP_DELAY_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_step_delay),
            processing_delay_ms: lookup("PROCESSING_DELAY_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_processing_delay),
        }
    }

    /// Pause after every outgoing message.
    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Pause after a sticker upload.
    #[must_use]
    pub const fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid API_ID format (must be a positive integer)")]
    InvalidApiId,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_telegram_config_new() {
        let config = TelegramConfig::new(12345, "abc123".to_owned(), "+10000000000".to_owned());
        assert_eq!(config.api_id, 12345);
        assert_eq!(config.api_hash, "abc123");
        assert_eq!(config.session_path, PathBuf::from("session.db"));
    }

    #[test]
    fn test_from_lookup_complete() {
        let config = TelegramConfig::from_lookup(env(&[
            ("API_ID", "42"),
            ("API_HASH", " deadbeef "),
            ("PHONE", "+123456789"),
            ("TG_SESSION_PATH", "custom.db"),
        ]))
        .unwrap();
        assert_eq!(config.api_id, 42);
        assert_eq!(config.api_hash, "deadbeef");
        assert_eq!(config.session_path, PathBuf::from("custom.db"));
    }

    #[test]
    fn test_from_lookup_missing_phone() {
        let err = TelegramConfig::from_lookup(env(&[("API_ID", "42"), ("API_HASH", "x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("PHONE")));
    }

    #[test]
    fn test_from_lookup_blank_hash() {
        let err = TelegramConfig::from_lookup(env(&[
            ("API_ID", "42"),
            ("API_HASH", "   "),
            ("PHONE", "+1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("API_HASH")));
    }

    #[test]
    fn test_from_lookup_invalid_api_id() {
        for bad in ["abc", "0", "-5"] {
            let err = TelegramConfig::from_lookup(env(&[
                ("API_ID", bad),
                ("API_HASH", "x"),
                ("PHONE", "+1"),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidApiId));
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = TelegramConfig::new(1, "supersecret".to_owned(), "+15551234567".to_owned());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("supersecret"));
        assert!(!rendered.contains("5551234567"));
    }

    #[test]
    fn test_upload_settings() {
        let defaults = UploadSettings::from_lookup(env(&[]));
        assert_eq!(defaults, UploadSettings::default());
        assert_eq!(defaults.step_delay(), Duration::from_secs(1));
        assert_eq!(defaults.processing_delay(), Duration::from_secs(2));

        let custom = UploadSettings::from_lookup(env(&[
            ("STEP_DELAY_MS", "1500"),
            ("PROCESSING_DELAY_MS", "nope"),
        ]));
        assert_eq!(custom.step_delay_ms, 1500);
        assert_eq!(custom.processing_delay_ms, 2000);
    }
}
