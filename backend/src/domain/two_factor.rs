//! Google Authenticator compatible time-based one-time passwords.
//!
//! RFC 6238 with HMAC-SHA1, a 30 second step and 6 digit codes. Codes from
//! the previous and next step are accepted to absorb clock drift. Secrets
//! are 20 random bytes stored as unpadded RFC 4648 Base32.

use std::sync::Arc;

use mockable::Clock;
use rand::Rng;
use totp_lite::{Sha1, totp_custom};

/// Length of a generated shared secret in bytes.
pub const SECRET_LEN: usize = 20;
/// Digits in every generated code.
pub const CODE_DIGITS: u32 = 6;
/// Seconds per time step.
pub const STEP_SECONDS: u64 = 30;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Error raised when a stored secret cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TwoFactorError {
    #[error("authenticator secret is not valid base32")]
    InvalidSecret,
    #[error("authenticator secret is empty")]
    EmptySecret,
}

/// Shared secret in its Base32 text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotpSecret {
    encoded: String,
    bytes: Vec<u8>,
}

impl TotpSecret {
    /// Draw a fresh random secret.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; SECRET_LEN];
        rand::thread_rng().fill(&mut bytes);
        Self {
            encoded: base32_encode(&bytes),
            bytes: bytes.to_vec(),
        }
    }

    /// Parse a stored secret. Whitespace, padding and lower case are tolerated.
    pub fn from_base32(encoded: &str) -> Result<Self, TwoFactorError> {
        let normalised: String = encoded
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>()
            .trim_end_matches('=')
            .to_ascii_uppercase();
        if normalised.is_empty() {
            return Err(TwoFactorError::EmptySecret);
        }
        let bytes = base32_decode(&normalised).ok_or(TwoFactorError::InvalidSecret)?;
        Ok(Self {
            encoded: normalised,
            bytes,
        })
    }

    /// Base32 text suitable for storage and manual entry.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// `otpauth://` URI consumed by authenticator apps when scanning a QR code.
///
/// # Examples
/// ```
/// use eform_base::domain::two_factor::provisioning_uri;
///
/// let uri = provisioning_uri("eForm", "ada@example.com", "GEZDGNBVGY3TQOJQ");
/// assert_eq!(
///     uri,
///     "otpauth://totp/eForm:ada%40example.com?secret=GEZDGNBVGY3TQOJQ&issuer=eForm&algorithm=SHA1&digits=6&period=30"
/// );
/// ```
pub fn provisioning_uri(issuer: &str, account: &str, secret: &str) -> String {
    let issuer = urlencoding::encode(issuer);
    let account = urlencoding::encode(account);
    format!(
        "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}&algorithm=SHA1&digits={CODE_DIGITS}&period={STEP_SECONDS}"
    )
}

/// Code for `secret` at the given Unix time.
pub fn code_at(secret: &TotpSecret, unix_seconds: u64) -> String {
    totp_custom::<Sha1>(STEP_SECONDS, CODE_DIGITS, secret.bytes(), unix_seconds)
}

/// Validates submitted codes against the injected clock.
#[derive(Clone)]
pub struct TotpVerifier {
    clock: Arc<dyn Clock>,
}

impl TotpVerifier {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Whether `code` matches the current, previous or next step.
    pub fn verify(&self, secret: &TotpSecret, code: &str) -> bool {
        let code = code.trim();
        if code.len() != CODE_DIGITS as usize || !code.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }

        let now = u64::try_from(self.clock.utc().timestamp()).unwrap_or(0);
        [now.saturating_sub(STEP_SECONDS), now, now.saturating_add(STEP_SECONDS)]
            .iter()
            .any(|instant| constant_time_eq(code_at(secret, *instant).as_bytes(), code.as_bytes()))
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn base32_encode(data: &[u8]) -> String {
    let mut output = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut buffer = 0_u32;
    let mut bits = 0_u32;

    for byte in data {
        buffer = (buffer << 8) | u32::from(*byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            output.push(char::from(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize]));
        }
    }
    if bits > 0 {
        output.push(char::from(
            BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize],
        ));
    }

    output
}

fn base32_decode(data: &str) -> Option<Vec<u8>> {
    let mut output = Vec::with_capacity(data.len() * 5 / 8);
    let mut buffer = 0_u32;
    let mut bits = 0_u32;

    for ch in data.bytes() {
        let value = match ch {
            b'A'..=b'Z' => ch - b'A',
            b'2'..=b'7' => ch - b'2' + 26,
            _ => return None,
        };
        buffer = (buffer << 5) | u32::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            output.push(((buffer >> bits) & 0xff) as u8);
        }
    }

    Some(output)
}

#[cfg(test)]
mod tests {
    //! RFC 6238 vectors and drift tolerance.
    use super::*;
    use crate::test_support::FixedClock;
    use rstest::rstest;

    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn rfc_secret() -> TotpSecret {
        TotpSecret::from_base32(RFC_SECRET).expect("valid secret")
    }

    fn verifier_at(unix: i64) -> TotpVerifier {
        TotpVerifier::new(Arc::new(FixedClock::at_unix(unix)))
    }

    #[rstest]
    fn rfc_secret_decodes_to_ascii_digits() {
        assert_eq!(rfc_secret().bytes(), b"12345678901234567890");
    }

    #[rstest]
    #[case(59, "287082")]
    #[case(1_111_111_109, "081804")]
    #[case(1_234_567_890, "005924")]
    fn codes_match_rfc_vectors(#[case] unix: u64, #[case] expected: &str) {
        assert_eq!(code_at(&rfc_secret(), unix), expected);
    }

    #[rstest]
    #[case(-30)]
    #[case(0)]
    #[case(30)]
    fn adjacent_steps_are_accepted(#[case] drift: i64) {
        let secret = rfc_secret();
        let code = code_at(&secret, 1_111_111_109);
        assert!(verifier_at(1_111_111_109 + drift).verify(&secret, &code));
    }

    #[rstest]
    fn codes_two_steps_away_are_rejected() {
        let secret = rfc_secret();
        let code = code_at(&secret, 1_111_111_109);
        assert!(!verifier_at(1_111_111_109 + 90).verify(&secret, &code));
    }

    #[rstest]
    #[case("")]
    #[case("12345")]
    #[case("12a456")]
    #[case("1234567")]
    fn malformed_codes_are_rejected(#[case] code: &str) {
        assert!(!verifier_at(59).verify(&rfc_secret(), code));
    }

    #[rstest]
    fn generated_secrets_round_trip_through_text() {
        let secret = TotpSecret::generate();
        assert_eq!(secret.as_str().len(), 32);
        let parsed = TotpSecret::from_base32(secret.as_str()).expect("parse");
        assert_eq!(parsed, secret);
    }

    #[rstest]
    #[case("", TwoFactorError::EmptySecret)]
    #[case("====", TwoFactorError::EmptySecret)]
    #[case("ABC1", TwoFactorError::InvalidSecret)]
    fn bad_secrets_are_rejected(#[case] raw: &str, #[case] expected: TwoFactorError) {
        assert_eq!(TotpSecret::from_base32(raw), Err(expected));
    }

    #[rstest]
    fn lower_case_secrets_are_normalised() {
        let secret = TotpSecret::from_base32("gezd gnbv gy3t qojq gezd gnbv gy3t qojq").expect("parse");
        assert_eq!(secret.as_str(), RFC_SECRET);
    }
}
