//! Sticker Pack Builder - Pack Creation Entry Point
//!
//! Reads the manifest written by `prepare_stickers` and registers the
//! pack by talking to Telegram's `@Stickers` bot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use dialoguer::{Input, Password};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use sticker_pack_builder::config::{
    MANIFEST_FILE_NAME, PackManifest, TelegramConfig, UploadSettings,
};
use sticker_pack_builder::telegram::{TelegramBot, TelegramError};
use sticker_pack_builder::uploader::{DryRunBackend, PackUploader, UploadReport};

/// Registers a Telegram sticker pack from a prepared manifest.
#[derive(Parser, Debug)]
#[command(name = "create_pack")]
#[command(about = "Create a Telegram sticker pack through @Stickers")]
#[command(version)]
struct Args {
    /// Path to the manifest written by `prepare_stickers`.
    #[arg(short, long, default_value_os_t = default_manifest_path())]
    manifest: PathBuf,

    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log the conversation instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

fn default_manifest_path() -> PathBuf {
    Path::new("output").join(MANIFEST_FILE_NAME)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    if !args.manifest.exists() {
        bail!(
            "Manifest {} not found. Run prepare_stickers first!",
            args.manifest.display()
        );
    }

    let manifest = PackManifest::load_from_file(&args.manifest)
        .context("Failed to load sticker manifest")?;
    manifest
        .validate()
        .context("Sticker manifest validation failed")?;

    let base_dir = args
        .manifest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let timing = UploadSettings::from_env_with_defaults();

    info!(
        "Loaded manifest '{}' ({}) with {} sticker(s)",
        manifest.title,
        manifest.short_name,
        manifest.len()
    );

    if args.dry_run {
        let report = PackUploader::new(DryRunBackend, timing)
            .run(&manifest, base_dir)
            .await
            .context("Dry run failed")?;
        print_report(&report, true);
        return Ok(());
    }

    // Credentials are checked before anything touches the network
    let tg_config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;

    let bot = TelegramBot::connect(&tg_config)
        .await
        .context("Failed to connect to Telegram")?;

    if let Err(e) = ensure_authorized(&bot, &tg_config).await {
        bot.disconnect();
        return Err(e);
    }

    match PackUploader::new(bot, timing).run(&manifest, base_dir).await {
        Ok(report) => {
            print_report(&report, false);
            Ok(())
        }
        Err(e) => {
            error!("Error creating sticker pack: {}", e);
            warn!("The pack may be half-created. Finish or cancel it manually with @Stickers.");
            Err(e).context("Sticker pack creation aborted")
        }
    }
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_report(report: &UploadReport, dry_run: bool) {
    println!("✓ {}", report.headline(dry_run));
    println!("  Uploaded: {} sticker(s)", report.uploaded.len());
    if !report.skipped.is_empty() {
        println!("  Skipped (file missing): {}", report.skipped.join(", "));
    }
    if !dry_run {
        println!("  Link: {}", report.pack_link());
    }
}

/// Signs in with the configured phone number if the session is new.
async fn ensure_authorized(bot: &TelegramBot, config: &TelegramConfig) -> Result<()> {
    if bot.is_authorized().await.context("Failed to check authorization")? {
        return Ok(());
    }

    info!("Authentication required");

    let token = bot
        .request_login_code(&config.phone, &config.api_hash)
        .await
        .context("Failed to request login code")?;

    info!("Login code sent to your Telegram app");

    let code: String = Input::new()
        .with_prompt("Enter the login code")
        .interact_text()?;

    match bot.sign_in(&token, code.trim()).await {
        Ok(()) => Ok(()),
        Err(TelegramError::PasswordRequired(password_token)) => {
            info!("Two-factor authentication is enabled");

            let hint = password_token.hint().unwrap_or("no hint");
            info!("Password hint: {}", hint);

            let password: String = Password::new()
                .with_prompt("Enter your 2FA password")
                .interact()?;

            bot.check_password(password_token, &password)
                .await
                .context("2FA authentication failed")?;

            Ok(())
        }
        Err(e) => Err(e).context("Authentication failed"),
    }
}
