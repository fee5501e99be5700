//! Shared fixtures: the export schema expressed with `prost` derive
//! macros, used to build payloads independently of the decoder under test.

#![allow(dead_code)]

use prost::Message;

/// Export message as the app writes it (parameters in field 1).
#[derive(Clone, PartialEq, Eq, Message)]
pub struct MigrationPayload {
    #[prost(message, repeated, tag = "1")]
    pub otp_parameters: Vec<OtpParameters>,
    #[prost(int32, tag = "2")]
    pub version: i32,
    #[prost(int32, tag = "3")]
    pub batch_size: i32,
    #[prost(int32, tag = "4")]
    pub batch_index: i32,
    #[prost(int32, tag = "5")]
    pub batch_id: i32,
}

/// Mirrored layout: version in field 1, parameters in field 2.
#[derive(Clone, PartialEq, Eq, Message)]
pub struct MirroredPayload {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(message, repeated, tag = "2")]
    pub otp_parameters: Vec<OtpParameters>,
}

#[derive(Clone, PartialEq, Eq, Message)]
pub struct OtpParameters {
    #[prost(bytes = "vec", tag = "1")]
    pub secret: Vec<u8>,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub issuer: String,
    #[prost(int32, tag = "4")]
    pub algorithm: i32,
    #[prost(int32, tag = "5")]
    pub digits: i32,
    #[prost(int32, tag = "6")]
    pub otp_type: i32,
    #[prost(int64, tag = "7")]
    pub counter: i64,
}

pub const ALGO_SHA1: i32 = 1;
pub const ALGO_SHA256: i32 = 2;
pub const ALGO_SHA512: i32 = 3;
pub const ALGO_MD5: i32 = 4;

pub const DIGITS_SIX: i32 = 1;
pub const DIGITS_EIGHT: i32 = 2;

pub const TYPE_HOTP: i32 = 1;
pub const TYPE_TOTP: i32 = 2;

/// Encode parameters as a version-1 export.
pub fn build_payload(entries: Vec<OtpParameters>) -> Vec<u8> {
    MigrationPayload {
        otp_parameters: entries,
        version: 1,
        batch_size: 1,
        batch_index: 0,
        batch_id: 12345,
    }
    .encode_to_vec()
}

/// Wrap payload bytes in an export URI.
pub fn build_migration_uri_from_bytes(bytes: &[u8]) -> String {
    let b64 = data_encoding::BASE64.encode(bytes);
    let url_encoded = b64
        .replace('+', "%2B")
        .replace('/', "%2F")
        .replace('=', "%3D");
    format!("otpauth-migration://offline?data={url_encoded}")
}

pub fn build_migration_uri(entries: Vec<OtpParameters>) -> String {
    build_migration_uri_from_bytes(&build_payload(entries))
}

pub fn test_otp(name: &str, issuer: &str, secret: &[u8]) -> OtpParameters {
    OtpParameters {
        secret: secret.to_vec(),
        name: name.to_string(),
        issuer: issuer.to_string(),
        algorithm: ALGO_SHA1,
        digits: DIGITS_SIX,
        otp_type: TYPE_TOTP,
        counter: 0,
    }
}
