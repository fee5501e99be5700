//! JSON output.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use otpmig_codec::Account;
use zeroize::Zeroizing;

use super::{create_private, TOTP_SECRET_NOTE};

fn to_pretty_json(accounts: &[Account]) -> Result<Zeroizing<String>> {
    serde_json::to_string_pretty(accounts)
        .map(Zeroizing::new)
        .context("Failed to serialize accounts")
}

/// Print accounts as pretty JSON on stdout.
pub fn print_json(accounts: &[Account]) -> Result<()> {
    let json = to_pretty_json(accounts)?;
    println!("{}", json.as_str());
    eprintln!("{TOTP_SECRET_NOTE}");
    Ok(())
}

/// Write accounts as pretty JSON to `path`.
///
/// Never overwrites: fails if `path` already exists. Missing parent
/// directories are created. The file is readable by the owner only.
pub fn save_json(accounts: &[Account], path: &Path) -> Result<()> {
    if path.exists() {
        bail!("File '{}' already exists", path.display());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }

    let json = to_pretty_json(accounts)?;
    let mut file = create_private(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write '{}'", path.display()))?;

    tracing::info!("Saved {} accounts to {}", accounts.len(), path.display());
    Ok(())
}
