//! Fuzz target for the migration payload decoder.
//!
//! Feeds arbitrary bytes to `decode_payload` and re-encodes every decoded
//! parameter as a provisioning URI. Must never panic.
//!
//! # Usage
//!
//! ```sh
//! cd crates/otpmig-codec
//! cargo +nightly fuzz run payload_decode -- -max_len=4096
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use otpmig_codec::{decode_payload, Account};

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = decode_payload(data) {
        let _ = payload.diagnostics();
        for otp in &payload.otp_parameters {
            let _ = Account::from(otp).to_provisioning_uri();
        }
    }
});
