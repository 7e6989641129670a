//! # appsign
//!
//! Command-line front end for [`appheader`]: signs bootloader application
//! images with their payload size and CRC32, checks signed images the way the
//! bootloader does, and prints image headers.

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tool configuration file handling.
mod config;
/// Image file reading and crash-safe writing.
mod file;
/// `appsign info`.
mod info;
/// Human-readable output.
mod report;
/// `appsign sign`.
mod sign;
/// `appsign verify`.
mod verify;

use config::SignConfig;

/// Sign bootloader application images with their size and CRC32.
#[derive(Parser)]
#[command(name = "appsign", version, about)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to `appsign.toml` when present).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Patch the header with the payload size and CRC32.
    Sign {
        /// Raw application binary.
        input: PathBuf,
        /// Where to write the signed binary.
        output: PathBuf,
        /// Check the written image like the bootloader would.
        #[arg(long)]
        verify: bool,
    },

    /// Check a signed image the way the bootloader does.
    Verify {
        /// Signed application binary.
        image: PathBuf,
        /// Largest accepted payload in bytes (decimal or 0x-prefixed hex).
        #[arg(long, value_parser = parse_int)]
        max_size: Option<u32>,
    },

    /// Print the header of an image.
    Info {
        /// Application binary, signed or not.
        image: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let config = SignConfig::load(cli.config.as_deref())?;
    debug!("config: {config:?}");

    match cli.command {
        Command::Sign {
            input,
            output,
            verify,
        } => sign::run(&config, &input, &output, verify),
        Command::Verify { image, max_size } => verify::run(&config, &image, max_size),
        Command::Info { image } => info::run(&image),
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal integer.
fn parse_int(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    u32::from_str_radix(&digits.replace('_', ""), radix).map_err(|e| format!("`{s}`: {e}"))
}
