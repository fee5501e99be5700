//! Interactive prompts on stdin/stdout.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use zeroize::Zeroizing;

const SECURITY_WARNING: &str = "\
WARNING: By using online QR decoders or untrusted ways of transferring the URI text,
you risk someone storing the QR code or URI text and stealing your 2FA codes!
Remember that the data contains the website, your email and the 2FA code!";

const URI_INSTRUCTIONS: &str = "\
Enter the URI from Google Authenticator QR code.
The URI looks like otpauth-migration://offline?data=...

You can get it by exporting from Google Authenticator app, then scanning the QR with
a QR code scanner app, and copying the text to your computer.";

/// Print the security warning and read one export URI.
pub fn prompt_uri() -> Result<Zeroizing<String>> {
    eprintln!("{SECURITY_WARNING}\n");
    println!("{URI_INSTRUCTIONS}\n");
    let uri = read_line(&mut io::stdin().lock(), "Enter URI: ")?;
    Ok(Zeroizing::new(uri.trim().to_string()))
}

/// Ask whether JSON output goes to `path`. Anything starting with `y`
/// (any case) is a yes.
pub fn confirm_save(path: &std::path::Path) -> Result<bool> {
    let answer = read_line(
        &mut io::stdin().lock(),
        &format!("Save to file '{}'? [y/N]: ", path.display()),
    )?;
    Ok(is_yes(&answer))
}

fn read_line(input: &mut impl BufRead, prompt: &str) -> Result<Zeroizing<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = Zeroizing::new(String::new());
    input.read_line(&mut line)?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

fn is_yes(answer: &str) -> bool {
    answer.trim_start().to_lowercase().starts_with('y')
}
