use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Joins the value and its tag. Must never occur in signed values; session
/// ids are base64url, which excludes it.
const DELIMITER: char = '.';

/// Signs opaque values with HMAC-SHA256 so a browser can hold them but not
/// mint or alter them.
///
/// A token is `value.base64url(hmac)`. Verification is stateless: the tag is
/// recomputed from the presented value on every call.
#[derive(Clone)]
pub struct Signer {
    secret: Vec<u8>,
}

impl Signer {
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Produce a tamper-evident token for `value`.
    #[must_use]
    pub fn sign(&self, value: &str) -> String {
        let tag = URL_SAFE_NO_PAD.encode(self.mac(value).finalize().into_bytes());
        format!("{value}{DELIMITER}{tag}")
    }

    /// Extract the signed value, or `None` if the token is malformed or the
    /// tag does not match. Tag comparison is constant-time.
    #[must_use]
    pub fn verify<'a>(&self, token: &'a str) -> Option<&'a str> {
        let (value, tag_b64) = token.split_once(DELIMITER)?;
        let tag = URL_SAFE_NO_PAD.decode(tag_b64).ok()?;
        self.mac(value).verify_slice(&tag).ok()?;
        Some(value)
    }

    fn mac(&self, value: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(value.as_bytes());
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> Signer {
        Signer::new("test-secret")
    }

    #[test]
    fn roundtrip() {
        let token = signer().sign("abc123");
        assert_eq!(signer().verify(&token), Some("abc123"));
    }

    #[test]
    fn empty_value_roundtrip() {
        let token = signer().sign("");
        assert_eq!(signer().verify(&token), Some(""));
    }

    #[test]
    fn tampered_payload_rejected() {
        let token = signer().sign("abc123");
        let forged = token.replacen("abc", "xyz", 1);
        assert_eq!(signer().verify(&forged), None);
    }

    #[test]
    fn tampered_tag_rejected() {
        let token = signer().sign("abc123");
        // Flip the final tag character.
        let mut chars: Vec<char> = token.chars().collect();
        let last = *chars.last().unwrap();
        *chars.last_mut().unwrap() = if last == 'A' { 'B' } else { 'A' };
        let forged: String = chars.into_iter().collect();
        assert_eq!(signer().verify(&forged), None);
    }

    #[test]
    fn missing_delimiter_rejected() {
        assert_eq!(signer().verify("no-delimiter-here"), None);
        assert_eq!(signer().verify(""), None);
    }

    #[test]
    fn garbage_tag_rejected() {
        assert_eq!(signer().verify("value.!!not-base64!!"), None);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = Signer::new("secret-a").sign("abc123");
        assert_eq!(Signer::new("secret-b").verify(&token), None);
    }

    #[test]
    fn sign_is_deterministic() {
        assert_eq!(signer().sign("abc123"), signer().sign("abc123"));
    }
}
