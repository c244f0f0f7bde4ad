//! Request signature verification
//!
//! Alma signs every POST by computing HMAC-SHA256 over the raw request body
//! and sending the base64 digest in the `x-exl-signature` header. The check
//! must run over the bytes exactly as received. Decoding and re-encoding
//! the JSON first would change whitespace and key order and corrupt the
//! digest.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the caller's base64 signature.
pub const SIGNATURE_HEADER: &str = "x-exl-signature";

/// Base64 HMAC-SHA256 digest of `body` under `secret`.
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = new_mac(secret);
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Constant-time check of a supplied signature against `body`.
///
/// A missing, empty or undecodable signature is a verification failure,
/// never an error.
pub fn verify_signature(secret: &str, body: &[u8], supplied: &str) -> bool {
    let Ok(decoded) = BASE64.decode(supplied) else {
        return false;
    };
    let mut mac = new_mac(secret);
    mac.update(body);
    mac.verify_slice(&decoded).is_ok()
}

fn new_mac(secret: &str) -> HmacSha256 {
    // HMAC accepts keys of any length, so this cannot fail.
    HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "itsasecret";

    // Digest values cross-checked against the Alma sandbox deliveries.
    const PLAIN_BODY: &[u8] = b"The POST request body";
    const PLAIN_BODY_SIGNATURE: &str = "e9SHoXK4MZrSGqhglMK4w+/u1pjYn0bfTEYtcFqj7CE=";

    #[test]
    fn test_compute_matches_known_digest() {
        assert_eq!(compute_signature(SECRET, PLAIN_BODY), PLAIN_BODY_SIGNATURE);
    }

    #[test]
    fn test_compute_matches_known_json_digest() {
        let body = br#"{"action": "THIS_IS_WRONG", "job_instance": {"name": "PPOD Export"}}"#;
        assert_eq!(
            compute_signature(SECRET, body),
            "2obxLFxF9gRkvaObLXXDpRO/mOcYlULyw5+nODvepK4="
        );
    }

    #[test]
    fn test_verify_round_trip() {
        let signature = compute_signature(SECRET, PLAIN_BODY);
        assert!(verify_signature(SECRET, PLAIN_BODY, &signature));
    }

    #[test]
    fn test_verify_rejects_wrong_signature() {
        assert!(!verify_signature(SECRET, PLAIN_BODY, "thisiswrong"));
    }

    #[test]
    fn test_verify_rejects_mutated_body() {
        assert!(!verify_signature(
            SECRET,
            b"The POST request body.",
            PLAIN_BODY_SIGNATURE
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        assert!(!verify_signature(
            "adifferentsecret",
            PLAIN_BODY,
            PLAIN_BODY_SIGNATURE
        ));
    }

    #[test]
    fn test_verify_rejects_non_base64_signature() {
        assert!(!verify_signature(SECRET, PLAIN_BODY, "not base64!!!"));
    }

    #[test]
    fn test_verify_rejects_empty_signature() {
        assert!(!verify_signature(SECRET, PLAIN_BODY, ""));
    }

    #[test]
    fn test_signatures_differ_per_secret() {
        let a = compute_signature("secret-a", PLAIN_BODY);
        let b = compute_signature("secret-b", PLAIN_BODY);
        assert_ne!(a, b);
    }
}
