//! Export URI parsing and provisioning URI generation.
//!
//! Inbound: `otpauth-migration://offline?data=<url-encoded-base64>` is
//! unwrapped down to the binary payload and decoded into accounts.
//!
//! Outbound: each [`Account`] becomes
//! `otpauth://{totp|hotp}/<label>?secret=<base32>[&issuer=..][&counter=n]`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::{form_urlencoded, Url};

use crate::account::Account;
use crate::error::{DecodeError, Diagnostic};
use crate::payload::{decode_payload, OtpType};

/// Required scheme prefix of an export URI (case-sensitive).
pub const MIGRATION_SCHEME: &str = "otpauth-migration";

/// Query parameter carrying the payload.
const DATA_PARAM: &str = "data";

/// Characters left unescaped in a path segment: unreserved plus the
/// sub-delimiters authenticator apps accept inside a label.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Everything recovered from one export URI.
#[derive(Debug, Clone, Default)]
pub struct ExportBatch {
    /// One account per exported parameter, in payload order.
    pub accounts: Vec<Account>,
    pub version: u64,
    /// Number of QR codes the export was split across.
    pub batch_size: u64,
    /// Position of this QR code within the export.
    pub batch_index: u64,
    /// Identifier shared by all QR codes of one export.
    pub batch_id: u64,
    /// Non-fatal findings (version mismatch, unknown enum values).
    pub diagnostics: Vec<Diagnostic>,
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Decode an export URI into its accounts.
///
/// An export without parameters yields an empty list.
///
/// # Errors
///
/// See [`decode_export`].
pub fn decode_export_uri(uri: &str) -> Result<Vec<Account>, DecodeError> {
    decode_export(uri).map(|batch| batch.accounts)
}

/// Decode an export URI into its accounts, batch metadata and diagnostics.
///
/// Decoding is all-or-nothing: on any error no account is returned.
///
/// # Errors
///
/// - [`DecodeError::InvalidUri`] if `uri` is not an absolute URI.
/// - [`DecodeError::InvalidScheme`] if the scheme does not start with
///   `otpauth-migration`.
/// - [`DecodeError::MissingDataParameter`] if `data` is absent or empty.
/// - [`DecodeError::UrlDecode`] on malformed percent-encoding.
/// - [`DecodeError::Base64Decode`] if the value is not padded base64.
/// - [`DecodeError::Payload`] if the payload bytes are invalid.
pub fn decode_export(uri: &str) -> Result<ExportBatch, DecodeError> {
    // Step 1: parse
    let parsed = Url::parse(uri).map_err(|e| DecodeError::InvalidUri(e.to_string()))?;

    // Step 2: scheme, as written (the parser lowercases it)
    let scheme = uri
        .trim()
        .split_once(':')
        .map_or_else(|| parsed.scheme(), |(scheme, _)| scheme);
    if !scheme.starts_with(MIGRATION_SCHEME) {
        return Err(DecodeError::InvalidScheme(scheme.to_string()));
    }

    // Step 3: raw `data` value
    let data = parsed
        .query()
        .and_then(raw_query_value)
        .filter(|value| !value.is_empty())
        .ok_or(DecodeError::MissingDataParameter)?;

    // Step 4: URL-decode
    let url_decoded = decode_query_component(data).map_err(DecodeError::UrlDecode)?;

    // Step 5: base64-decode
    let bytes = data_encoding::BASE64
        .decode(&url_decoded)
        .map_err(|e| DecodeError::Base64Decode(e.to_string()))?;

    // Step 6: payload
    let payload = decode_payload(&bytes)?;

    // Step 7: accounts, in payload order
    Ok(ExportBatch {
        accounts: payload.otp_parameters.iter().map(Account::from).collect(),
        version: payload.version,
        batch_size: payload.batch_size,
        batch_index: payload.batch_index,
        batch_id: payload.batch_id,
        diagnostics: payload.diagnostics(),
    })
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Build the `otpauth://` provisioning URI for an account.
///
/// The label is escaped with path-segment rules; secret and issuer with
/// query-component rules. The issuer is omitted when empty and the
/// counter is present only for HOTP accounts.
#[must_use]
pub fn to_provisioning_uri(account: &Account) -> String {
    let otp_type = match account.otp_type() {
        OtpType::Hotp => "hotp",
        _ => "totp",
    };

    let label = utf8_percent_encode(account.name(), PATH_SEGMENT);
    let mut uri = format!(
        "otpauth://{otp_type}/{label}?secret={}",
        query_escape(account.totp_secret())
    );

    if !account.issuer().is_empty() {
        uri.push_str("&issuer=");
        uri.push_str(&query_escape(account.issuer()));
    }

    if let Some(counter) = account.counter() {
        uri.push_str(&format!("&counter={counter}"));
    }

    uri
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// First value of the `data` parameter, still percent-encoded. Keys are
/// compared after decoding; pairs whose key does not decode are skipped.
fn raw_query_value(query: &str) -> Option<&str> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_query_component(key).ok()?;
        (key == DATA_PARAM.as_bytes()).then_some(value)
    })
}

fn query_escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Decode one query component in form encoding: `+` is a space and every
/// `%` must open a two-digit hex escape.
fn decode_query_component(raw: &str) -> Result<Vec<u8>, String> {
    let bytes = raw.as_bytes();
    let bad_escape = bytes
        .iter()
        .enumerate()
        .find(|&(at, &b)| b == b'%' && !is_hex_escape(bytes, at));
    if let Some((at, _)) = bad_escape {
        return Err(format!("malformed percent-escape at byte {at}"));
    }

    let spaced = raw.replace('+', " ");
    Ok(percent_decode_str(&spaced).collect())
}

/// Whether `bytes[at]` is followed by two hex digits.
fn is_hex_escape(bytes: &[u8], at: usize) -> bool {
    bytes
        .get(at.saturating_add(1)..at.saturating_add(3))
        .is_some_and(|digits| digits.iter().all(u8::is_ascii_hexdigit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::payload::{Algorithm, DigitCount, OtpParameter};
    use zeroize::Zeroizing;

    fn account(name: &str, issuer: &str, otp_type: OtpType, counter: i64) -> Account {
        Account::from(&OtpParameter {
            secret: Zeroizing::new(b"Hello!".to_vec()),
            name: name.into(),
            issuer: issuer.into(),
            algorithm: Algorithm::Sha1,
            digits: DigitCount::Six,
            otp_type,
            counter,
        })
    }

    #[test]
    fn query_component_decodes_form_encoding() {
        assert_eq!(decode_query_component("AB%2BCD%3D%3D").unwrap(), b"AB+CD==");
        assert_eq!(decode_query_component("a+b").unwrap(), b"a b");
        assert_eq!(decode_query_component("%2f%2F").unwrap(), b"//");
        assert_eq!(decode_query_component("").unwrap(), b"");
    }

    #[test]
    fn query_component_rejects_bad_escapes() {
        for raw in ["EAE%3", "EAE%", "%G1AA", "AA%%41"] {
            let err = decode_query_component(raw).unwrap_err();
            assert!(err.contains("malformed percent-escape"), "raw: {raw}");
        }
    }

    #[test]
    fn raw_query_value_takes_first_data() {
        assert_eq!(raw_query_value("data=abc&data=def"), Some("abc"));
        assert_eq!(raw_query_value("x=1&data=a%3D"), Some("a%3D"));
        assert_eq!(raw_query_value("data"), Some(""));
        assert_eq!(raw_query_value("otherParam=123"), None);
        assert_eq!(raw_query_value("metadata=1"), None);
    }

    #[test]
    fn raw_query_value_decodes_keys_only() {
        assert_eq!(raw_query_value("d%61ta=EAE%3D"), Some("EAE%3D"));
        assert_eq!(raw_query_value("%zz=1&data=x"), Some("x"));
    }

    #[test]
    fn escaped_data_key_is_found() {
        let accounts = decode_export_uri("otpauth-migration://offline?d%61ta=EAE%3D").unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn malformed_percent_in_data_is_url_decode_error() {
        let err = decode_export_uri("otpauth-migration://offline?data=AB%G1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UrlDecode);
    }

    #[test]
    fn scheme_check_is_case_sensitive() {
        let err = decode_export_uri("OTPAUTH-MIGRATION://offline?data=AAAA").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidScheme);
    }

    #[test]
    fn scheme_prefix_is_enough() {
        // An empty payload under a scheme that merely starts with the prefix.
        let accounts = decode_export_uri("otpauth-migration2://offline?data=EAE%3D").unwrap();
        assert!(accounts.is_empty());
    }

    #[test]
    fn provisioning_uri_totp_with_issuer() {
        let uri = to_provisioning_uri(&account("alice@example.com", "ACME Co", OtpType::Totp, 0));
        assert_eq!(
            uri,
            "otpauth://totp/alice@example.com?secret=JBSWY3DPEE&issuer=ACME+Co"
        );
    }

    #[test]
    fn provisioning_uri_hotp_counter() {
        let uri = to_provisioning_uri(&account("Counter key 1", "", OtpType::Hotp, 1));
        assert_eq!(
            uri,
            "otpauth://hotp/Counter%20key%201?secret=JBSWY3DPEE&counter=1"
        );
    }

    #[test]
    fn provisioning_uri_label_uses_path_rules() {
        let uri = to_provisioning_uri(&account("a/b?c;d,e Corp:me", "", OtpType::Totp, 0));
        assert!(uri.starts_with("otpauth://totp/a%2Fb%3Fc%3Bd%2Ce%20Corp:me?secret="));
    }

    #[test]
    fn provisioning_uri_issuer_uses_query_rules() {
        let uri = to_provisioning_uri(&account("x", "A&B=C/D", OtpType::Totp, 0));
        assert!(uri.ends_with("&issuer=A%26B%3DC%2FD"));
    }

    #[test]
    fn provisioning_uri_unspecified_type_is_totp() {
        let uri = to_provisioning_uri(&account("x", "", OtpType::Unspecified, 4));
        assert_eq!(uri, "otpauth://totp/x?secret=JBSWY3DPEE");
    }
}
