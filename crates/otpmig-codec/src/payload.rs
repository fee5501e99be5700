//! Google Authenticator migration payload decoder.
//!
//! Interprets the primitive field stream from [`crate::wire`] according to
//! the fixed export schema. Only the fields listed below are modelled;
//! anything else is skipped.
//!
//! ```text
//! MigrationPayload
//!   1 | 2  LEN     OtpParameter (repeated, order preserved)
//!   1 | 2  VARINT  version
//!   3      VARINT  batch_size
//!   4      VARINT  batch_index
//!   5      VARINT  batch_id
//!
//! OtpParameter
//!   1  LEN     secret (raw bytes)
//!   2  LEN     name
//!   3  LEN     issuer
//!   4  VARINT  algorithm
//!   5  VARINT  digits
//!   6  VARINT  type
//!   7  VARINT  counter
//! ```
//!
//! Exports from the app put the parameter list in field 1 and the version
//! in field 2. The top level is dispatched on field number *and* wire
//! type, so the mirrored layout (version in 1, parameters in 2) decodes
//! the same way.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::{Diagnostic, EnumField, PayloadError};
use crate::wire::{FieldReader, FieldValue};

/// Payload version every known export carries.
pub const EXPECTED_VERSION: u64 = 1;

// ---------------------------------------------------------------------------
// Enum fields
// ---------------------------------------------------------------------------

/// OTP type (`OtpParameter` field 6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum OtpType {
    #[default]
    Unspecified,
    Hotp,
    Totp,
    /// A value outside the schema's range, kept verbatim.
    Unrecognized(u64),
}

impl OtpType {
    #[must_use]
    pub const fn from_wire(value: u64) -> Self {
        match value {
            0 => Self::Unspecified,
            1 => Self::Hotp,
            2 => Self::Totp,
            other => Self::Unrecognized(other),
        }
    }

    /// Export label; unrecognized values fall back to the UNSPECIFIED label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unspecified | Self::Unrecognized(_) => "OTP_TYPE_UNSPECIFIED",
            Self::Hotp => "HOTP",
            Self::Totp => "TOTP",
        }
    }
}

/// Hash algorithm (`OtpParameter` field 4).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Algorithm {
    #[default]
    Unspecified,
    Sha1,
    Sha256,
    Sha512,
    Md5,
    /// A value outside the schema's range, kept verbatim.
    Unrecognized(u64),
}

impl Algorithm {
    #[must_use]
    pub const fn from_wire(value: u64) -> Self {
        match value {
            0 => Self::Unspecified,
            1 => Self::Sha1,
            2 => Self::Sha256,
            3 => Self::Sha512,
            4 => Self::Md5,
            other => Self::Unrecognized(other),
        }
    }

    /// Export label; unrecognized values fall back to the UNSPECIFIED label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unspecified | Self::Unrecognized(_) => "ALGORITHM_UNSPECIFIED",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
            Self::Md5 => "MD5",
        }
    }
}

/// Code length (`OtpParameter` field 5).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum DigitCount {
    #[default]
    Unspecified,
    Six,
    Eight,
    /// A value outside the schema's range, kept verbatim.
    Unrecognized(u64),
}

impl DigitCount {
    #[must_use]
    pub const fn from_wire(value: u64) -> Self {
        match value {
            0 => Self::Unspecified,
            1 => Self::Six,
            2 => Self::Eight,
            other => Self::Unrecognized(other),
        }
    }

    /// Export label; unrecognized values fall back to the UNSPECIFIED label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unspecified | Self::Unrecognized(_) => "DIGIT_COUNT_UNSPECIFIED",
            Self::Six => "SIX",
            Self::Eight => "EIGHT",
        }
    }
}

impl From<OtpType> for &'static str {
    fn from(value: OtpType) -> Self {
        value.label()
    }
}

impl From<Algorithm> for &'static str {
    fn from(value: Algorithm) -> Self {
        value.label()
    }
}

impl From<DigitCount> for &'static str {
    fn from(value: DigitCount) -> Self {
        value.label()
    }
}

impl fmt::Display for OtpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for DigitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// One OTP account as carried in the export.
///
/// The secret buffer is wiped when the value is dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OtpParameter {
    pub secret: Zeroizing<Vec<u8>>,
    pub name: String,
    pub issuer: String,
    pub algorithm: Algorithm,
    pub digits: DigitCount,
    pub otp_type: OtpType,
    /// Only meaningful for HOTP. Signed, as the app writes it.
    pub counter: i64,
}

impl fmt::Debug for OtpParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpParameter")
            .field("secret", &"***")
            .field("name", &self.name)
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("digits", &self.digits)
            .field("otp_type", &self.otp_type)
            .field("counter", &self.counter)
            .finish()
    }
}

/// Top-level export message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPayload {
    pub version: u64,
    pub otp_parameters: Vec<OtpParameter>,
    pub batch_size: u64,
    pub batch_index: u64,
    pub batch_id: u64,
}

impl MigrationPayload {
    /// Non-fatal findings: a version other than [`EXPECTED_VERSION`],
    /// then every out-of-range enum value in entry order.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        if self.version != EXPECTED_VERSION {
            out.push(Diagnostic::VersionMismatch {
                found: self.version,
            });
        }

        for (index, otp) in self.otp_parameters.iter().enumerate() {
            let unknown = [
                (EnumField::Algorithm, unrecognized_algorithm(otp.algorithm)),
                (EnumField::Digits, unrecognized_digits(otp.digits)),
                (EnumField::Type, unrecognized_type(otp.otp_type)),
            ];
            out.extend(unknown.into_iter().filter_map(|(field, value)| {
                value.map(|value| Diagnostic::UnknownEnumValue {
                    index,
                    field,
                    value,
                })
            }));
        }
        out
    }
}

const fn unrecognized_algorithm(value: Algorithm) -> Option<u64> {
    match value {
        Algorithm::Unrecognized(raw) => Some(raw),
        _ => None,
    }
}

const fn unrecognized_digits(value: DigitCount) -> Option<u64> {
    match value {
        DigitCount::Unrecognized(raw) => Some(raw),
        _ => None,
    }
}

const fn unrecognized_type(value: OtpType) -> Option<u64> {
    match value {
        OtpType::Unrecognized(raw) => Some(raw),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decode a raw migration payload.
///
/// Parameters appear in the output in the same order as in the byte
/// stream. Absent fields keep their zero defaults.
///
/// # Errors
///
/// Returns [`PayloadError::ProtocolViolation`] if the primitive reader
/// rejects the bytes (at the top level or inside any parameter), and
/// [`PayloadError::InvalidString`] if a name or issuer is not UTF-8.
pub fn decode_payload(bytes: &[u8]) -> Result<MigrationPayload, PayloadError> {
    let mut payload = MigrationPayload::default();

    for field in FieldReader::new(bytes) {
        let field = field?;
        match (field.number, field.value) {
            (1 | 2, FieldValue::Bytes(body)) => {
                payload.otp_parameters.push(decode_parameter(body)?);
            }
            (1 | 2, FieldValue::Varint(v)) => payload.version = v,
            (3, FieldValue::Varint(v)) => payload.batch_size = v,
            (4, FieldValue::Varint(v)) => payload.batch_index = v,
            (5, FieldValue::Varint(v)) => payload.batch_id = v,
            _ => {}
        }
    }

    Ok(payload)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn decode_parameter(body: &[u8]) -> Result<OtpParameter, PayloadError> {
    let mut otp = OtpParameter::default();

    for field in FieldReader::new(body) {
        let field = field?;
        match (field.number, field.value) {
            (1, FieldValue::Bytes(b)) => otp.secret = Zeroizing::new(b.to_vec()),
            (2, FieldValue::Bytes(b)) => otp.name = decode_string(b, "name")?,
            (3, FieldValue::Bytes(b)) => otp.issuer = decode_string(b, "issuer")?,
            (4, FieldValue::Varint(v)) => otp.algorithm = Algorithm::from_wire(v),
            (5, FieldValue::Varint(v)) => otp.digits = DigitCount::from_wire(v),
            (6, FieldValue::Varint(v)) => otp.otp_type = OtpType::from_wire(v),
            (7, FieldValue::Varint(v)) => otp.counter = i64::from_le_bytes(v.to_le_bytes()),
            _ => {}
        }
    }

    Ok(otp)
}

fn decode_string(bytes: &[u8], field: &'static str) -> Result<String, PayloadError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| PayloadError::InvalidString { field })
}
