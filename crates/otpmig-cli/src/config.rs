//! Optional user configuration, stored as plain JSON.
//!
//! Command-line flags always win over values read from the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::{Cli, OutputMode};

const CONFIG_DIR: &str = "otpmig";
const CONFIG_FILE: &str = "config.json";

/// Defaults for the extractor.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Output mode used when `--output` is not given.
    #[serde(default)]
    pub output: OutputMode,

    /// Target of `--save` for JSON output.
    #[serde(default = "default_json_file")]
    pub json_file: PathBuf,

    /// Directory that receives QR code images.
    #[serde(default = "default_qr_dir")]
    pub qr_dir: PathBuf,

    /// Minimum edge length of a QR code image, in pixels.
    #[serde(default = "default_qr_size")]
    pub qr_size: u32,

    /// Whether the listing shows full secrets.
    #[serde(default)]
    pub show_secrets: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputMode::default(),
            json_file: default_json_file(),
            qr_dir: default_qr_dir(),
            qr_size: default_qr_size(),
            show_secrets: false,
        }
    }
}

fn default_json_file() -> PathBuf {
    "accounts.json".into()
}
fn default_qr_dir() -> PathBuf {
    "qrcodes".into()
}
const fn default_qr_size() -> u32 {
    256
}

impl Config {
    /// `{config_dir}/otpmig/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the config file at `path`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Resolve the effective settings: file (explicit or default
    /// location) first, then command-line overrides.
    pub fn resolve(cli: &Cli) -> Self {
        let mut config = cli
            .config
            .clone()
            .or_else(Self::default_path)
            .map_or_else(Self::default, |path| {
                tracing::debug!("Reading config from {}", path.display());
                Self::load(&path)
            });

        if let Some(output) = cli.output {
            config.output = output;
        }
        if let Some(file) = &cli.file {
            config.json_file.clone_from(file);
        }
        if let Some(dir) = &cli.dir {
            config.qr_dir.clone_from(dir);
        }
        config.show_secrets |= cli.show_secrets;
        config
    }
}
