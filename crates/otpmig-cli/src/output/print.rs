//! Human-readable listings.

use std::fmt::Write as _;

use otpmig_codec::{Account, OtpType};

use super::TOTP_SECRET_NOTE;

const COLUMN: usize = 21;
const SHORT_COLUMN: usize = 8;

/// Compact table: name, issuer, type and digits. Never shows secrets.
pub fn render_table(accounts: &[Account]) -> String {
    let border = format!(
        "+{}+{}+{}+{}+\n",
        "-".repeat(COLUMN + 2),
        "-".repeat(COLUMN + 2),
        "-".repeat(SHORT_COLUMN + 2),
        "-".repeat(SHORT_COLUMN + 2),
    );

    let mut out = border.clone();
    let _ = writeln!(
        out,
        "| {:<COLUMN$} | {:<COLUMN$} | {:<SHORT_COLUMN$} | {:<SHORT_COLUMN$} |",
        "Name", "Issuer", "Type", "Digits"
    );
    out.push_str(&border);
    for account in accounts {
        let _ = writeln!(
            out,
            "| {:<COLUMN$} | {:<COLUMN$} | {:<SHORT_COLUMN$} | {:<SHORT_COLUMN$} |",
            truncate(account.name(), COLUMN),
            truncate(account.issuer(), COLUMN),
            truncate(account.otp_type().label(), SHORT_COLUMN),
            truncate(account.digits().label(), SHORT_COLUMN),
        );
    }
    out.push_str(&border);
    out
}

/// Detailed per-account listing. Secrets are masked unless
/// `show_secrets` is set.
pub fn render_details(accounts: &[Account], show_secrets: bool) -> String {
    let mut out = String::from("Google Authenticator Accounts\n\n");
    let _ = writeln!(
        out,
        "Extracted at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "Total accounts: {}\n", accounts.len());

    for (i, account) in accounts.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "{}", "\u{2500}".repeat(50));
        }
        let _ = writeln!(out, "Account #{}:", i.saturating_add(1));
        let _ = writeln!(out, "  Name: {}", account.name());
        if !account.issuer().is_empty() {
            let _ = writeln!(out, "  Issuer: {}", account.issuer());
        }
        let _ = writeln!(out, "  Type: {}", account.otp_type());
        let _ = writeln!(out, "  Algorithm: {}", account.algorithm());
        let _ = writeln!(out, "  Digits: {}", account.digits());
        if let (OtpType::Hotp, Some(counter)) = (account.otp_type(), account.counter()) {
            let _ = writeln!(out, "  Counter: {counter}");
        }

        if show_secrets {
            let _ = writeln!(out, "  Secret (BASE32): {}", account.totp_secret());
            let _ = writeln!(out, "  Secret (BASE64): {}", account.secret());
        } else {
            let _ = writeln!(out, "  Secret: {}", account.masked_secret());
        }
    }

    out
}

/// Print the detailed listing on stdout.
pub fn print_details(accounts: &[Account], show_secrets: bool) {
    print!("{}", render_details(accounts, show_secrets));
    println!();
    if show_secrets {
        eprintln!("Warning: full secrets are displayed. Clear your terminal history when done.");
    } else {
        eprintln!("To view full secrets, run again with --show-secrets.");
    }
    eprintln!("{TOTP_SECRET_NOTE}");
}

/// Cut `s` to at most `max` characters, ending in `...` when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "otpauth-migration://offline?data=CiIKCkhlbGwPId6tvugSDlRlc3QgYWNjb3VudCAxIAEoATACCiIKCgBlbGxvId6tvu8SDlRlc3QgYWNjb3VudCAyIAEoATACCiMKCgBEjWxkLzvjHR8SDUNvdW50ZXIga2V5IDEgASgBMAE4ARABGAEgACj8nJf4Bg%3D%3D";

    fn accounts() -> Vec<Account> {
        otpmig_codec::decode_export_uri(URI).unwrap()
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("short", 21), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééééééé", 8), "ééééé...");
    }

    #[test]
    fn table_lists_every_account() {
        let table = render_table(&accounts());
        assert!(table.contains("| Test account 1 "));
        assert!(table.contains("| Counter key 1 "));
        assert!(table.contains("| HOTP     | SIX      |"));
        assert!(!table.contains("JBSWY3APEHPK3PXI"));
        assert_eq!(table.lines().count(), 3 + 3 + 1);
    }

    #[test]
    fn details_mask_secrets_by_default() {
        let details = render_details(&accounts(), false);
        assert!(details.contains("Total accounts: 3"));
        assert!(details.contains("Account #3:"));
        assert!(details.contains("  Counter: 1"));
        assert!(details.contains("  Secret: JBSW************"));
        assert!(!details.contains("JBSWY3APEHPK3PXI"));
    }

    #[test]
    fn details_show_secrets_on_request() {
        let details = render_details(&accounts(), true);
        assert!(details.contains("  Secret (BASE32): JBSWY3APEHPK3PXI"));
        assert!(details.contains("  Secret (BASE64): SGVsbA8h3q2+6A=="));
    }
}
