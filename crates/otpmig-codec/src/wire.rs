//! Minimal reader for the length-delimited binary wire format.
//!
//! Only the two wire types the migration schema uses are supported:
//! varint (0) and length-delimited (2). Every read takes a buffer and a
//! cursor and returns the decoded value together with the new cursor.
//! Nothing here allocates or panics, whatever the input.

use crate::error::WireError;

/// Longest legal varint encoding of a 64-bit value.
const MAX_VARINT_LEN: usize = 10;

/// Wire type carried in the low three bits of a field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Wire type 0.
    Varint,
    /// Wire type 2.
    LengthDelimited,
}

/// One decoded field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Varint(u64),
    Bytes(&'a [u8]),
}

/// A field read from the byte stream: `(field number, value)`.
///
/// The wire type is implied by the [`FieldValue`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    pub number: u64,
    pub value: FieldValue<'a>,
}

impl RawField<'_> {
    /// Wire type the field was encoded with.
    #[must_use]
    pub const fn wire_type(&self) -> WireType {
        match self.value {
            FieldValue::Varint(_) => WireType::Varint,
            FieldValue::Bytes(_) => WireType::LengthDelimited,
        }
    }
}

/// Decode one base-128 varint starting at `pos`.
///
/// Groups are little-endian; a clear high bit terminates the value.
///
/// # Errors
///
/// Returns [`WireError::MalformedVarint`] if `pos` is at or past the end
/// of `buf`, if the buffer ends before the terminating byte, or if the
/// encoding is longer than ten bytes.
pub fn read_varint(buf: &[u8], pos: usize) -> Result<(u64, usize), WireError> {
    let malformed = WireError::MalformedVarint { offset: pos };
    let window = buf.get(pos..).ok_or_else(|| malformed.clone())?;

    let mut value = 0u64;
    let groups = window
        .iter()
        .take(MAX_VARINT_LEN)
        .zip((0..u64::BITS).step_by(7));
    for (consumed, (&byte, shift)) in (1usize..).zip(groups) {
        value |= u64::from(byte & 0x7F).wrapping_shl(shift);
        if byte & 0x80 == 0 {
            let end = pos.checked_add(consumed).ok_or(malformed)?;
            return Ok((value, end));
        }
    }

    Err(malformed)
}

/// Decode a field tag at `pos` into `(field number, wire type, new pos)`.
///
/// # Errors
///
/// Propagates [`WireError::MalformedVarint`] and returns
/// [`WireError::UnsupportedWireType`] for wire types other than 0 and 2.
pub fn read_tag(buf: &[u8], pos: usize) -> Result<(u64, WireType, usize), WireError> {
    let (key, next) = read_varint(buf, pos)?;
    let wire_type = match key & 0x7 {
        0 => WireType::Varint,
        2 => WireType::LengthDelimited,
        other => {
            return Err(WireError::UnsupportedWireType {
                wire_type: u8::try_from(other).unwrap_or(u8::MAX),
                offset: pos,
            })
        }
    };
    Ok((key.wrapping_shr(3), wire_type, next))
}

/// Decode a length prefix at `pos` and borrow that many bytes.
///
/// # Errors
///
/// Propagates [`WireError::MalformedVarint`] for a bad length prefix and
/// returns [`WireError::TruncatedMessage`] when fewer bytes remain than
/// declared.
pub fn read_length_delimited(buf: &[u8], pos: usize) -> Result<(&[u8], usize), WireError> {
    let (declared, start) = read_varint(buf, pos)?;
    let truncated = || WireError::TruncatedMessage {
        offset: start,
        declared,
        remaining: buf.len().saturating_sub(start),
    };

    let len = usize::try_from(declared).map_err(|_| truncated())?;
    let end = start.checked_add(len).ok_or_else(truncated)?;
    let bytes = buf.get(start..end).ok_or_else(truncated)?;
    Ok((bytes, end))
}

/// Sequential field reader over one message body.
///
/// Each value is consumed according to its wire type, so callers skip an
/// unknown field just by ignoring it. After the first error the reader
/// yields nothing more.
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> FieldReader<'a> {
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            failed: false,
        }
    }

    fn read_field(&mut self) -> Result<RawField<'a>, WireError> {
        let (number, wire_type, next) = read_tag(self.buf, self.pos)?;
        let (value, next) = match wire_type {
            WireType::Varint => {
                let (v, next) = read_varint(self.buf, next)?;
                (FieldValue::Varint(v), next)
            }
            WireType::LengthDelimited => {
                let (bytes, next) = read_length_delimited(self.buf, next)?;
                (FieldValue::Bytes(bytes), next)
            }
        };
        self.pos = next;
        Ok(RawField { number, value })
    }
}

impl<'a> Iterator for FieldReader<'a> {
    type Item = Result<RawField<'a>, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let field = self.read_field();
        self.failed = field.is_err();
        Some(field)
    }
}
