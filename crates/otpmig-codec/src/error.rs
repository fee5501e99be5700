//! Error and diagnostic types for `otpmig-codec`.
//!
//! Fatal failures are layered the same way the decoder is: [`WireError`]
//! for the primitive reader, [`PayloadError`] for the message schema and
//! [`DecodeError`] for the export URI. Non-fatal findings are reported as
//! [`Diagnostic`] values alongside a successful decode.

use std::fmt;

use thiserror::Error;

/// Errors produced by the primitive wire-format reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// A varint ran past the end of the buffer, started past the end, or
    /// was longer than ten bytes.
    #[error("malformed varint at offset {offset}")]
    MalformedVarint {
        /// Offset at which the varint started.
        offset: usize,
    },

    /// A tag carried a wire type other than varint (0) or length-delimited (2).
    #[error("unsupported wire type {wire_type} at offset {offset}")]
    UnsupportedWireType {
        /// The low three bits of the tag.
        wire_type: u8,
        /// Offset of the tag.
        offset: usize,
    },

    /// A length-delimited field declared more bytes than remain.
    #[error("truncated message at offset {offset}: declared {declared} bytes, {remaining} remaining")]
    TruncatedMessage {
        /// Offset of the first payload byte.
        offset: usize,
        /// Declared field length.
        declared: u64,
        /// Bytes actually left in the buffer.
        remaining: usize,
    },
}

/// Errors produced while interpreting the migration message schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The primitive reader rejected the byte stream.
    #[error("protocol violation: {0}")]
    ProtocolViolation(#[from] WireError),

    /// A string field (name or issuer) is not valid UTF-8.
    #[error("protocol violation: {field} is not valid UTF-8")]
    InvalidString {
        /// Which string field failed.
        field: &'static str,
    },
}

/// Errors produced when decoding an `otpauth-migration://` export URI.
///
/// Every variant aborts the whole decode: no partial account list is
/// ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input is not a well-formed absolute URI.
    #[error("invalid URI format: {0}")]
    InvalidUri(String),

    /// The URI scheme does not start with `otpauth-migration`.
    #[error("invalid URI scheme: expected 'otpauth-migration', got '{0}'")]
    InvalidScheme(String),

    /// The `data` query parameter is absent or empty.
    #[error("missing 'data' parameter in URI")]
    MissingDataParameter,

    /// The `data` value contains a malformed percent-encoding.
    #[error("failed to URL-decode data parameter: {0}")]
    UrlDecode(String),

    /// The URL-decoded `data` value is not valid padded base64.
    #[error("failed to base64-decode data: {0}")]
    Base64Decode(String),

    /// The decoded bytes are not a valid migration payload.
    #[error("failed to decode payload: {0}")]
    Payload(#[from] PayloadError),
}

/// Flat classification of a [`DecodeError`], down to the primitive cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUri,
    InvalidScheme,
    MissingDataParameter,
    UrlDecode,
    Base64Decode,
    MalformedVarint,
    UnsupportedWireType,
    TruncatedMessage,
    InvalidString,
}

impl DecodeError {
    /// The category of this failure, looking through payload wrapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUri(_) => ErrorKind::InvalidUri,
            Self::InvalidScheme(_) => ErrorKind::InvalidScheme,
            Self::MissingDataParameter => ErrorKind::MissingDataParameter,
            Self::UrlDecode(_) => ErrorKind::UrlDecode,
            Self::Base64Decode(_) => ErrorKind::Base64Decode,
            Self::Payload(PayloadError::InvalidString { .. }) => ErrorKind::InvalidString,
            Self::Payload(PayloadError::ProtocolViolation(wire)) => match wire {
                WireError::MalformedVarint { .. } => ErrorKind::MalformedVarint,
                WireError::UnsupportedWireType { .. } => ErrorKind::UnsupportedWireType,
                WireError::TruncatedMessage { .. } => ErrorKind::TruncatedMessage,
            },
        }
    }
}

/// The enum-valued `OtpParameter` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumField {
    Algorithm,
    Digits,
    Type,
}

impl fmt::Display for EnumField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Algorithm => "algorithm",
            Self::Digits => "digits",
            Self::Type => "type",
        })
    }
}

/// A non-fatal finding produced during a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The payload version is not 1. The payload is still decoded with
    /// the same schema.
    VersionMismatch {
        /// The version the payload declared.
        found: u64,
    },

    /// An enum field carried a number outside its defined range; the
    /// account falls back to the UNSPECIFIED label.
    UnknownEnumValue {
        /// Position of the parameter in the payload.
        index: usize,
        /// Which enum field.
        field: EnumField,
        /// The raw numeric value.
        value: u64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionMismatch { found } => write!(
                f,
                "expected payload version 1, but got {found}; this might cause issues"
            ),
            Self::UnknownEnumValue {
                index,
                field,
                value,
            } => write!(
                f,
                "entry {index}: unknown {field} value {value}, using UNSPECIFIED"
            ),
        }
    }
}
