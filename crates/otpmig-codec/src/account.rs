//! Public account record built from a decoded `OtpParameter`.
//!
//! The raw secret is carried twice: as padded standard base64 (a lossless
//! passthrough of the exported bytes) and as unpadded RFC 4648 base32,
//! which is what authenticator apps expect.

use std::fmt;

use data_encoding::{BASE32_NOPAD, BASE64};
use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::payload::{Algorithm, DigitCount, OtpParameter, OtpType};
use crate::uri;

/// Characters replaced by `_` when an account is turned into a file name.
const UNSAFE_FILENAME_CHARS: &[char] = &[
    '\\', '/', ':', '*', '?', '"', '<', '>', '|', '%', '&', '{', '}', '$', '+', '!', '\'', '=',
    '@',
];

/// One recovered OTP account.
///
/// Built once from an [`OtpParameter`] and never mutated afterwards.
/// String fields are wiped on drop. Serializes to the record shape other
/// tooling consumes: `name`, `issuer` (omitted when empty), `secret`,
/// `totpSecret`, `type`, `algorithm`, `digits`, `counter` (HOTP only).
#[derive(Clone, PartialEq, Eq, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    issuer: String,
    secret: String,
    totp_secret: String,
    #[serde(rename = "type")]
    #[zeroize(skip)]
    otp_type: OtpType,
    #[zeroize(skip)]
    algorithm: Algorithm,
    #[zeroize(skip)]
    digits: DigitCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    counter: Option<i64>,
}

impl Account {
    /// Transcode a decoded parameter. Never fails: absent fields become
    /// empty strings or UNSPECIFIED labels.
    #[must_use]
    pub fn from_parameter(otp: &OtpParameter) -> Self {
        Self {
            name: otp.name.clone(),
            issuer: otp.issuer.clone(),
            secret: BASE64.encode(otp.secret.as_slice()),
            totp_secret: BASE32_NOPAD.encode(otp.secret.as_slice()),
            otp_type: otp.otp_type,
            algorithm: otp.algorithm,
            digits: otp.digits,
            counter: (otp.otp_type == OtpType::Hotp).then_some(otp.counter),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Issuer, possibly empty.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Standard padded base64 of the raw secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Unpadded base32 of the raw secret; the value to give other apps.
    #[must_use]
    pub fn totp_secret(&self) -> &str {
        &self.totp_secret
    }

    #[must_use]
    pub const fn otp_type(&self) -> OtpType {
        self.otp_type
    }

    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub const fn digits(&self) -> DigitCount {
        self.digits
    }

    /// HOTP counter; `None` for every other type.
    #[must_use]
    pub const fn counter(&self) -> Option<i64> {
        self.counter
    }

    /// `otpauth://` provisioning URI for this account.
    #[must_use]
    pub fn to_provisioning_uri(&self) -> String {
        uri::to_provisioning_uri(self)
    }

    /// File stem for a per-account QR image: `"<issuer> (<name>)"`.
    ///
    /// An empty issuer becomes `No_Issuer`; characters that are unsafe in
    /// file names are replaced with `_`.
    #[must_use]
    pub fn qr_file_stem(&self) -> String {
        let issuer = if self.issuer.is_empty() {
            "No_Issuer"
        } else {
            &self.issuer
        };
        format!(
            "{} ({})",
            sanitize_filename(issuer),
            sanitize_filename(&self.name)
        )
    }

    /// Base32 secret with everything after the first four characters
    /// replaced by `*`.
    #[must_use]
    pub fn masked_secret(&self) -> String {
        let len = self.totp_secret.len();
        if len <= 4 {
            return "****".to_string();
        }
        let visible = self.totp_secret.get(..4).unwrap_or_default();
        format!("{visible}{}", "*".repeat(len.saturating_sub(4)))
    }
}

impl From<&OtpParameter> for Account {
    fn from(otp: &OtpParameter) -> Self {
        Self::from_parameter(otp)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("name", &self.name)
            .field("issuer", &self.issuer)
            .field("secret", &"***")
            .field("totp_secret", &"***")
            .field("otp_type", &self.otp_type)
            .field("algorithm", &self.algorithm)
            .field("digits", &self.digits)
            .field("counter", &self.counter)
            .finish()
    }
}

/// Map a decoded parameter to its public record.
#[must_use]
pub fn to_account(otp: &OtpParameter) -> Account {
    Account::from_parameter(otp)
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    fn otp(name: &str, issuer: &str, secret: &[u8], otp_type: OtpType, counter: i64) -> OtpParameter {
        OtpParameter {
            secret: Zeroizing::new(secret.to_vec()),
            name: name.into(),
            issuer: issuer.into(),
            algorithm: Algorithm::Sha1,
            digits: DigitCount::Six,
            otp_type,
            counter,
        }
    }

    #[test]
    fn secret_is_encoded_both_ways() {
        let account = to_account(&otp("a", "", b"Hello!", OtpType::Totp, 0));
        assert_eq!(account.secret(), "SGVsbG8h");
        assert_eq!(account.totp_secret(), "JBSWY3DPEE");
    }

    #[test]
    fn base32_has_no_padding() {
        let account = to_account(&otp("a", "", &[1, 2, 3], OtpType::Totp, 0));
        assert!(!account.totp_secret().contains('='));
        assert_eq!(
            BASE32_NOPAD
                .decode(account.totp_secret().as_bytes())
                .unwrap(),
            vec![1, 2, 3]
        );
        // base64 keeps its padding
        assert_eq!(account.secret(), "AQID");
        let two = to_account(&otp("a", "", &[1, 2], OtpType::Totp, 0));
        assert_eq!(two.secret(), "AQI=");
    }

    #[test]
    fn counter_only_for_hotp() {
        let hotp = to_account(&otp("h", "", b"k", OtpType::Hotp, 0));
        assert_eq!(hotp.counter(), Some(0));
        let totp = to_account(&otp("t", "", b"k", OtpType::Totp, 99));
        assert_eq!(totp.counter(), None);
        let unknown = to_account(&otp("u", "", b"k", OtpType::Unrecognized(7), 5));
        assert_eq!(unknown.counter(), None);
    }

    #[test]
    fn absent_fields_are_defaults() {
        let account = Account::from(&OtpParameter::default());
        assert_eq!(account.name(), "");
        assert_eq!(account.issuer(), "");
        assert_eq!(account.secret(), "");
        assert_eq!(account.totp_secret(), "");
        assert_eq!(account.otp_type(), OtpType::Unspecified);
        assert_eq!(account.algorithm(), Algorithm::Unspecified);
        assert_eq!(account.digits(), DigitCount::Unspecified);
    }

    #[test]
    fn json_shape_totp() {
        let account = to_account(&otp("alice", "", b"Hello!", OtpType::Totp, 3));
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "alice",
                "secret": "SGVsbG8h",
                "totpSecret": "JBSWY3DPEE",
                "type": "TOTP",
                "algorithm": "SHA1",
                "digits": "SIX",
            })
        );
    }

    #[test]
    fn json_shape_hotp_keeps_zero_counter() {
        let account = to_account(&otp("bob", "Corp", b"Hello!", OtpType::Hotp, 0));
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["issuer"], "Corp");
        assert_eq!(json["type"], "HOTP");
        assert_eq!(json["counter"], 0);
    }

    #[test]
    fn negative_hotp_counter_keeps_its_sign() {
        let account = to_account(&otp("a", "", b"k", OtpType::Hotp, -1));
        assert_eq!(account.counter(), Some(-1));
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["counter"], -1);
        assert!(account.to_provisioning_uri().ends_with("&counter=-1"));
    }

    #[test]
    fn qr_file_stem_sanitizes() {
        let account = to_account(&otp("me@x.com", "A/B:C", b"k", OtpType::Totp, 0));
        assert_eq!(account.qr_file_stem(), "A_B_C (me_x.com)");
        let no_issuer = to_account(&otp("plain", "", b"k", OtpType::Totp, 0));
        assert_eq!(no_issuer.qr_file_stem(), "No_Issuer (plain)");
    }

    #[test]
    fn masked_secret_keeps_prefix() {
        let account = to_account(&otp("a", "", b"Hello!", OtpType::Totp, 0));
        assert_eq!(account.masked_secret(), "JBSW******");
        let short = to_account(&otp("a", "", &[0xFF], OtpType::Totp, 0));
        assert_eq!(short.totp_secret().len(), 2);
        assert_eq!(short.masked_secret(), "****");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let account = to_account(&otp("a", "", b"Hello!", OtpType::Totp, 0));
        let rendered = format!("{account:?}");
        assert!(!rendered.contains("JBSWY3DPEE"));
        assert!(!rendered.contains("SGVsbG8h"));
    }
}
