//! `otpmig-codec`: Google Authenticator migration payload codec.
//!
//! Decodes `otpauth-migration://offline?data=...` export URIs into
//! [`Account`] records and re-encodes each record as a standard
//! `otpauth://` provisioning URI. Decoding is synchronous and does no
//! I/O.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod wire;

pub mod payload;

pub mod account;

pub mod uri;

pub use account::{to_account, Account};
pub use error::{DecodeError, Diagnostic, EnumField, ErrorKind, PayloadError, WireError};
pub use payload::{
    decode_payload, Algorithm, DigitCount, MigrationPayload, OtpParameter, OtpType,
    EXPECTED_VERSION,
};
pub use uri::{decode_export, decode_export_uri, to_provisioning_uri, ExportBatch, MIGRATION_SCHEME};
pub use wire::{read_length_delimited, read_tag, read_varint, FieldReader, FieldValue, RawField, WireType};
