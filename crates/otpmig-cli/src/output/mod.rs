//! Presentation of recovered accounts: JSON, listings and QR codes.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

pub mod json;
pub mod print;
pub mod qr;

/// Hint shown after secrets are printed in any form.
pub const TOTP_SECRET_NOTE: &str = "Note: when adding accounts to other authenticator apps, \
use the 'totpSecret' value as the secret key, not the 'secret' value.";

/// Create `path` for writing, failing if it exists. On Unix the file is
/// owner-only (0600) from the moment it is created.
fn create_private(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
