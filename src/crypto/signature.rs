use base64::{Engine as _, engine::general_purpose};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// The single signature algorithm the gateway accepts.
pub const SUPPORTED_ALGORITHM: &str = "HMAC-SHA256";

/// Builds the canonical request string both sides sign.
///
/// Field order is fixed: `METHOD | PATH[?QUERY] | RAW_BODY | TIMESTAMP |
/// NONCE`, joined with a single `|`. The path carries the raw query string
/// exactly as received (no re-encoding or re-ordering), and timestamp and
/// nonce are the header values verbatim.
pub fn canonical_string(
    method: &str,
    path_and_query: &str,
    body: &str,
    timestamp: &str,
    nonce: &str,
) -> String {
    [method, path_and_query, body, timestamp, nonce].join("|")
}

/// Computes HMAC-SHA256 over the UTF-8 bytes of the canonical string.
pub fn compute_signature(canonical: &str, key: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(canonical.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verifies a client-supplied base64 signature against the canonical string.
///
/// The comparison runs in time independent of the position of the first
/// mismatching byte. A malformed base64 signature is a distinct error from
/// a signature that simply does not match.
pub fn verify_signature(canonical: &str, key: &[u8], supplied_base64: &str) -> Result<()> {
    let supplied = general_purpose::STANDARD
        .decode(supplied_base64)
        .map_err(|_| AppError::Authentication("invalid signature encoding".to_string()))?;

    let expected = compute_signature(canonical, key)?;

    if expected.ct_eq(&supplied).into() {
        Ok(())
    } else {
        Err(AppError::Authentication("invalid signature".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test-gateway-secret";

    fn sign(canonical: &str) -> String {
        general_purpose::STANDARD.encode(compute_signature(canonical, KEY).unwrap())
    }

    #[test]
    fn canonical_string_has_fixed_field_order() {
        let canonical = canonical_string(
            "POST",
            "/API/grades?term=2026",
            r#"{"studentId":"S-1001"}"#,
            "1700000000000",
            "nonce-1",
        );
        assert_eq!(
            canonical,
            "POST|/API/grades?term=2026|{\"studentId\":\"S-1001\"}|1700000000000|nonce-1"
        );
    }

    #[test]
    fn canonical_string_uses_empty_body_when_absent() {
        let canonical = canonical_string("GET", "/API/profile", "", "1700000000000", "n");
        assert_eq!(canonical, "GET|/API/profile||1700000000000|n");
    }

    #[test]
    fn valid_signature_verifies() {
        let canonical = canonical_string("GET", "/API/profile", "", "1700000000000", "n-1");
        let signature = sign(&canonical);
        assert!(verify_signature(&canonical, KEY, &signature).is_ok());
    }

    #[test]
    fn signature_is_sensitive_to_every_field() {
        let base = ("GET", "/API/profile?x=1", "body", "1700000000000", "n-1");
        let canonical = canonical_string(base.0, base.1, base.2, base.3, base.4);
        let signature = sign(&canonical);

        let mutations = [
            canonical_string("PUT", base.1, base.2, base.3, base.4),
            canonical_string(base.0, "/API/profile?x=2", base.2, base.3, base.4),
            canonical_string(base.0, base.1, "bodY", base.3, base.4),
            canonical_string(base.0, base.1, base.2, "1700000000001", base.4),
            canonical_string(base.0, base.1, base.2, base.3, "n-2"),
        ];

        for mutated in mutations {
            assert!(
                matches!(
                    verify_signature(&mutated, KEY, &signature),
                    Err(AppError::Authentication(msg)) if msg == "invalid signature"
                ),
                "mutation accepted: {}",
                mutated
            );
        }
    }

    #[test]
    fn malformed_base64_is_a_distinct_error() {
        let canonical = canonical_string("GET", "/API/profile", "", "1700000000000", "n-1");
        let result = verify_signature(&canonical, KEY, "!!not-base64!!");
        assert!(matches!(
            result,
            Err(AppError::Authentication(msg)) if msg == "invalid signature encoding"
        ));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let canonical = canonical_string("GET", "/API/profile", "", "1700000000000", "n-1");
        let signature = sign(&canonical);
        assert!(verify_signature(&canonical, b"other-key", &signature).is_err());
    }

    #[test]
    fn truncated_signature_fails_verification() {
        let canonical = canonical_string("GET", "/API/profile", "", "1700000000000", "n-1");
        let truncated = general_purpose::STANDARD
            .encode(&compute_signature(&canonical, KEY).unwrap()[..16]);
        assert!(verify_signature(&canonical, KEY, &truncated).is_err());
    }
}
