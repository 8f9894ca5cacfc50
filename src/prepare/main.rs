//! Converts a folder of images into stickers and writes the pack manifest.
//!
//! The manifest lands next to the converted files so `create_pack` can
//! find it without extra configuration.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sticker_pack_builder::config::{DEFAULT_EMOJI, MANIFEST_FILE_NAME};
use sticker_pack_builder::normalizer::{
    ConversionReport, PrepareOptions, PrepareOutcome, prepare_pack,
};

/// Exit status used when there are no images to convert.
const EXIT_NOTHING_TO_DO: u8 = 2;

/// Sticker preparation tool.
#[derive(Parser, Debug)]
#[command(name = "prepare_stickers")]
#[command(about = "Converts images into 512x512 WebP stickers and writes sticker_config.json")]
#[command(version)]
struct Args {
    /// Directory containing the source PNG/JPEG images.
    #[arg(short, long, default_value = "input")]
    input: PathBuf,

    /// Directory receiving the WebP files and the manifest.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Pack title written into the manifest.
    #[arg(long)]
    title: Option<String>,

    /// Pack short name written into the manifest.
    #[arg(long)]
    short_name: Option<String>,

    /// Emoji attached to every sticker.
    #[arg(long, default_value = DEFAULT_EMOJI)]
    emoji: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = std::fs::create_dir_all(&args.input) {
        eprintln!("✗ Failed to create input directory {}: {e}", args.input.display());
        return ExitCode::FAILURE;
    }

    let options = PrepareOptions {
        title: args.title,
        short_name: args.short_name,
        emoji: args.emoji,
    };

    println!("Processing images...");
    let outcome = match prepare_pack(&args.input, &args.output, options) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        PrepareOutcome::NothingToDo(report) => {
            print_failures(&report);
            println!("No images found in {}!", args.input.display());
            ExitCode::from(EXIT_NOTHING_TO_DO)
        }
        PrepareOutcome::Written {
            path,
            manifest,
            report,
        } => {
            print_failures(&report);
            println!("✓ Processed {} image(s)", manifest.len());
            println!("✓ Configuration generated: {}", path.display());
            println!("\nEdit {MANIFEST_FILE_NAME} to customize:");
            println!("1. Change title and short_name");
            println!("2. Set custom emojis for stickers");
            println!("3. Add/remove stickers");
            println!("\nThen run: create_pack");
            ExitCode::SUCCESS
        }
    }
}

fn print_failures(report: &ConversionReport) {
    if report.failed.is_empty() {
        return;
    }

    warn!("{} image(s) could not be converted", report.failed.len());
    for failed in &report.failed {
        println!("  ⚠ {}: {}", failed.file, failed.reason);
    }
}
