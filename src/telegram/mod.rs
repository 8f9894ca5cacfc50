//! Telegram client wrapper module.
//!
//! Provides the signed-in `grammers` session used to talk to `@Stickers`.

mod client;

pub use client::{TelegramBot, TelegramError};
