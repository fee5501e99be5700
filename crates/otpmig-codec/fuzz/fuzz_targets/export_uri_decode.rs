//! Fuzz target for export URI decoding.
//!
//! # Usage
//!
//! ```sh
//! cd crates/otpmig-codec
//! cargo +nightly fuzz run export_uri_decode -- -max_len=8192
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = otpmig_codec::decode_export(s);
    }
});
