//! QR codes for `otpauth://` provisioning URIs, as PNG files or drawn in
//! the terminal.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageBuffer, ImageFormat, Luma};
use otpmig_codec::Account;
use qrcode::render::unicode::Dense1x2;
use qrcode::QrCode;
use zeroize::Zeroizing;

use super::create_private;

/// Write one PNG per account into `dir`, named after
/// [`Account::qr_file_stem`]. Existing files are skipped and a failing
/// account does not stop the others. Images are owner-only on Unix.
/// Returns the paths written.
pub fn save_qr_codes(accounts: &[Account], dir: &Path, size: u32) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory '{}'", dir.display()))?;

    let mut written = Vec::with_capacity(accounts.len());
    for account in accounts {
        let path = dir.join(format!("{}.png", account.qr_file_stem()));
        if path.exists() {
            tracing::warn!("File '{}' already exists, skipping", path.display());
            continue;
        }

        let uri = Zeroizing::new(account.to_provisioning_uri());
        match render_png(&uri, size).and_then(|img| write_png(&img, &path)) {
            Ok(()) => {
                tracing::info!("Created QR code: {}", path.display());
                written.push(path);
            }
            Err(e) => tracing::error!("Failed to create QR code for '{}': {e:#}", account.name()),
        }
    }

    Ok(written)
}

/// Print each account's QR code to stdout using half-block characters.
pub fn print_terminal(accounts: &[Account]) -> Result<()> {
    for account in accounts {
        let uri = Zeroizing::new(account.to_provisioning_uri());
        let label = if account.issuer().is_empty() {
            account.name().to_string()
        } else {
            format!("{} ({})", account.issuer(), account.name())
        };
        println!("{label}");
        println!("{}", render_terminal(&uri)?.as_str());
    }
    Ok(())
}

fn render_png(data: &str, size: u32) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>> {
    let code = QrCode::new(data.as_bytes()).context("QR encode error")?;
    Ok(code
        .render::<Luma<u8>>()
        .min_dimensions(size, size)
        .build())
}

fn write_png(img: &ImageBuffer<Luma<u8>, Vec<u8>>, path: &Path) -> Result<()> {
    let file = create_private(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    img.write_to(&mut BufWriter::new(file), ImageFormat::Png)
        .with_context(|| format!("Failed to write '{}'", path.display()))
}

fn render_terminal(data: &str) -> Result<Zeroizing<String>> {
    let code = QrCode::new(data.as_bytes()).context("QR encode error")?;
    Ok(Zeroizing::new(
        code.render::<Dense1x2>()
            .dark_color(Dense1x2::Light)
            .light_color(Dense1x2::Dark)
            .build(),
    ))
}
