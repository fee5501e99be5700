//! `otpmig`: extract OTP secrets from Google Authenticator export URIs.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

mod cli;
mod config;
mod logging;
mod output;
mod prompt;

use anyhow::{bail, Context, Result};
use clap::Parser;
use otpmig_codec::{decode_export, Account};
use zeroize::Zeroizing;

use crate::cli::{Cli, OutputMode};
use crate::config::Config;
use crate::output::{json, print, qr};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::resolve(&cli);

    let mut uris: Vec<Zeroizing<String>> =
        cli.all_uris().into_iter().map(Zeroizing::new).collect();
    let interactive = cli.interactive || uris.is_empty();
    if interactive {
        uris.push(prompt::prompt_uri()?);
    }
    uris.retain(|uri| !uri.trim().is_empty());
    if uris.is_empty() {
        bail!("No URI provided");
    }

    let accounts = decode_all(&uris)?;
    eprintln!("Successfully decoded {} accounts", accounts.len());

    match config.output {
        OutputMode::Json => {
            if cli.save || (interactive && prompt::confirm_save(&config.json_file)?) {
                json::save_json(&accounts, &config.json_file)
                    .context("Failed to save JSON")?;
                print!("{}", print::render_table(&accounts));
                eprintln!(
                    "Saved {} accounts to {}",
                    accounts.len(),
                    config.json_file.display()
                );
            } else {
                json::print_json(&accounts)?;
            }
        }
        OutputMode::Qrcode => {
            let written = qr::save_qr_codes(&accounts, &config.qr_dir, config.qr_size)
                .context("Failed to generate QR codes")?;
            print!("{}", print::render_table(&accounts));
            eprintln!(
                "Created {} QR codes in {}",
                written.len(),
                config.qr_dir.display()
            );
        }
        OutputMode::Print => print::print_details(&accounts, config.show_secrets),
        OutputMode::Terminal => qr::print_terminal(&accounts)?,
    }

    Ok(())
}

/// Decode every URI and concatenate the accounts in argument order.
/// Each URI is all-or-nothing; the first failure aborts.
fn decode_all(uris: &[Zeroizing<String>]) -> Result<Vec<Account>> {
    let mut accounts = Vec::new();
    for (i, uri) in uris.iter().enumerate() {
        let number = i.saturating_add(1);
        let batch =
            decode_export(uri).with_context(|| format!("Failed to decode URI #{number}"))?;

        tracing::debug!(
            "URI #{number}: {} accounts, batch {}/{} (id {})",
            batch.accounts.len(),
            batch.batch_index.saturating_add(1),
            batch.batch_size,
            batch.batch_id
        );
        for diagnostic in &batch.diagnostics {
            tracing::warn!("URI #{number}: {diagnostic}");
        }

        accounts.extend(batch.accounts);
    }
    Ok(accounts)
}
