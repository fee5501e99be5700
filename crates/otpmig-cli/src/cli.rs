//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    name = "otpmig",
    version,
    about = "Extract TOTP/HOTP secrets from a Google Authenticator export",
    long_about = "Extract TOTP/HOTP secrets from a Google Authenticator export.\n\n\
        1. Export accounts from the Google Authenticator app.\n\
        2. Scan the QR code to obtain the \"otpauth-migration://offline?data=...\" URI.\n\
        3. Pass the URI to this tool (or run it without arguments to be prompted)."
)]
pub struct Cli {
    /// Export URIs (`otpauth-migration://offline?data=...`)
    #[arg(value_name = "URI")]
    pub uris: Vec<String>,

    /// Export URI; may be repeated
    #[arg(short, long = "uri", value_name = "URI")]
    pub uri: Vec<String>,

    /// Prompt for the URI on stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// Output mode
    #[arg(short, long, value_enum)]
    pub output: Option<OutputMode>,

    /// JSON output file (used with `--save`)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Directory for QR code images
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Write JSON to the output file instead of stdout
    #[arg(long)]
    pub save: bool,

    /// Show full secrets in the listing
    #[arg(long)]
    pub show_secrets: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// URIs in argument order: positionals first, then `--uri` values.
    pub fn all_uris(&self) -> Vec<String> {
        self.uris.iter().chain(&self.uri).cloned().collect()
    }
}

/// How recovered accounts are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Pretty-printed JSON records
    #[default]
    Json,
    /// One PNG QR code per account
    Qrcode,
    /// Human-readable listing
    Print,
    /// QR codes drawn in the terminal
    Terminal,
}
