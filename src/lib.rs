//! Sticker Pack Builder Library
//!
//! Turns a folder of images into a Telegram sticker pack.
//!
//! This crate provides the core functionality for:
//! - Normalizing PNG/JPEG images into 512×512 WebP stickers
//! - Writing and validating the pack manifest
//! - Connecting to Telegram via `MTProto`
//! - Replaying the `@Stickers` conversation that registers the pack

pub mod config;
pub mod normalizer;
pub mod telegram;
pub mod uploader;
