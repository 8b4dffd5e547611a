//! Compact session-token codec
//!
//! Tokens are three URL-safe-base64 segments joined by `.`:
//! `header.claims.signature`, where the signature is HMAC-SHA256 over
//! `header || "." || claims` keyed by the gateway secret. The header is the
//! fixed `{"typ":"JWT","alg":"HS256"}`.
//!
//! Signature comparison is constant-time with respect to the expected
//! (secret-derived) signature.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize)]
struct Header {
    typ: &'static str,
    alg: &'static str,
}

const HEADER: Header = Header {
    typ: "JWT",
    alg: "HS256",
};

/// Compute the signature segment over already-encoded header and claims
/// segments.
pub fn sign(header_b64: &str, claims_b64: &str, secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(claims_b64.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Serialize and sign claims into a complete token.
pub fn encode<C: Serialize>(claims: &C, secret: &[u8]) -> Result<String, AuthError> {
    let header_json = serde_json::to_vec(&HEADER).map_err(|_| AuthError::Malformed)?;
    let claims_json = serde_json::to_vec(claims).map_err(|_| AuthError::Malformed)?;

    let header_b64 = URL_SAFE_NO_PAD.encode(header_json);
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json);
    let signature = sign(&header_b64, &claims_b64, secret);

    Ok(format!("{header_b64}.{claims_b64}.{signature}"))
}

/// Deserialize the claims segment without checking the signature.
pub fn decode<C: DeserializeOwned>(token: &str) -> Result<C, AuthError> {
    let (_, claims_b64, _) = split(token)?;
    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| AuthError::Malformed)?;
    serde_json::from_slice(&claims_json).map_err(|_| AuthError::Malformed)
}

/// Recompute the signature over the token's header and claims segments and
/// compare it against the presented signature before deserializing.
pub fn verify<C: DeserializeOwned>(token: &str, secret: &[u8]) -> Result<C, AuthError> {
    let (header_b64, claims_b64, signature_b64) = split(token)?;
    let expected = sign(header_b64, claims_b64, secret);

    // The expected signature is secret-derived; compare in constant time.
    if !bool::from(expected.as_bytes().ct_eq(signature_b64.as_bytes())) {
        return Err(AuthError::InvalidSignature);
    }

    decode(token)
}

fn split(token: &str) -> Result<(&str, &str, &str), AuthError> {
    let mut segments = token.split('.');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(claims), Some(signature), None) => Ok((header, claims, signature)),
        _ => Err(AuthError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestClaims {
        sub: i64,
        name: String,
    }

    const SECRET: &[u8] = b"codec-test-secret";

    fn claims() -> TestClaims {
        TestClaims {
            sub: 42,
            name: "pub1".to_string(),
        }
    }

    #[test]
    fn test_encode_verify_round_trip() {
        let token = encode(&claims(), SECRET).unwrap();
        let decoded: TestClaims = verify(&token, SECRET).unwrap();
        assert_eq!(decoded, claims());
    }

    #[test]
    fn test_token_has_three_segments() {
        let token = encode(&claims(), SECRET).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_sign_is_deterministic() {
        let a = sign("aGVhZGVy", "Y2xhaW1z", SECRET);
        let b = sign("aGVhZGVy", "Y2xhaW1z", SECRET);
        assert_eq!(a, b);

        let other = sign("aGVhZGVy", "Y2xhaW1z", b"other-secret");
        assert_ne!(a, other);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode(&claims(), SECRET).unwrap();
        let result: Result<TestClaims, _> = verify(&token, b"wrong-secret");
        assert_eq!(result.unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let token = encode(&claims(), SECRET).unwrap();
        let mut segments: Vec<&str> = token.split('.').collect();

        let mut tampered = segments[1].to_string();
        let replacement = if tampered.starts_with('A') { "B" } else { "A" };
        tampered.replace_range(0..1, replacement);
        segments[1] = &tampered;

        let forged = segments.join(".");
        let result: Result<TestClaims, _> = verify(&forged, SECRET);
        assert_eq!(result.unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn test_tampered_header_rejected() {
        let token = encode(&claims(), SECRET).unwrap();
        let mut segments: Vec<&str> = token.split('.').collect();

        let mut tampered = segments[0].to_string();
        let replacement = if tampered.starts_with('e') { "f" } else { "e" };
        tampered.replace_range(0..1, replacement);
        segments[0] = &tampered;

        let forged = segments.join(".");
        let result: Result<TestClaims, _> = verify(&forged, SECRET);
        assert_eq!(result.unwrap_err(), AuthError::InvalidSignature);
    }

    #[test]
    fn test_segment_count_enforced() {
        for garbage in ["", "a", "a.b", "a.b.c.d", "not a token at all"] {
            let result: Result<TestClaims, _> = verify(garbage, SECRET);
            assert_eq!(result.unwrap_err(), AuthError::Malformed, "{garbage:?}");
        }
    }

    #[test]
    fn test_decode_skips_signature_check() {
        let token = encode(&claims(), SECRET).unwrap();
        let mut segments: Vec<&str> = token.split('.').collect();
        segments[2] = "bm90LWEtc2lnbmF0dXJl";
        let forged = segments.join(".");

        // decode succeeds even with a bogus signature; verify does not.
        let decoded: TestClaims = decode(&forged).unwrap();
        assert_eq!(decoded, claims());
        let verified: Result<TestClaims, _> = verify(&forged, SECRET);
        assert_eq!(verified.unwrap_err(), AuthError::InvalidSignature);
    }
}
