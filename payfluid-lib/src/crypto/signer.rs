//! Outbound request signing.
//!
//! The gateway's integrity scheme concatenates the *values* of the
//! request body in ascending key order, MACs the result with the
//! session's salt, and RSA-encrypts the hex digest. Signer and gateway
//! must agree exactly on the key set and sort order; an added or renamed
//! key changes the signature.

use serde_json::{Map, Value};

use super::{hmac_sha256_hex, rsa_encrypt_b64};
use crate::credentials::SecureCredentials;
use crate::Result;

/// Render a body value the way it appears in the signing string.
///
/// Strings contribute their raw text (no quotes). Numbers keep a zero
/// fraction: `1.0` stays `"1.0"`. Booleans render as `true`/`false`.
pub(crate) fn value_fragment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Concatenate body values in ascending key order, with no separator.
pub fn canonicalize_sorted(body: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = body.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| value_fragment(&body[key]))
        .collect()
}

/// Sign a request body with the session's salt and RSA public key.
///
/// Returns the base64 ciphertext sent as the `signature` header of the
/// payment-link request.
pub fn sign(credentials: &SecureCredentials, body: &Map<String, Value>) -> Result<String> {
    let canonical = canonicalize_sorted(body);
    let digest = hmac_sha256_hex(credentials.sha256_salt.as_bytes(), canonical.as_bytes())?;
    rsa_encrypt_b64(&credentials.rsa_public_key, digest.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_canonicalization_sorts_keys_and_drops_them() {
        let body = body(json!({
            "mobile": "0241111111",
            "amount": 1.5,
            "session": "S1",
        }));
        assert_eq!(canonicalize_sorted(&body), "1.50241111111S1");
    }

    #[test]
    fn test_canonicalization_ignores_insertion_order() {
        let mut first = Map::new();
        first.insert("b".into(), json!("two"));
        first.insert("a".into(), json!("one"));

        let mut second = Map::new();
        second.insert("a".into(), json!("one"));
        second.insert("b".into(), json!("two"));

        assert_eq!(canonicalize_sorted(&first), canonicalize_sorted(&second));
        assert_eq!(canonicalize_sorted(&first), "onetwo");
    }

    #[test]
    fn test_whole_number_floats_keep_zero_fraction() {
        let body = body(json!({ "amount": 3.0 }));
        assert_eq!(canonicalize_sorted(&body), "3.0");
    }

    #[test]
    fn test_integers_and_booleans_render_plain() {
        let body = body(json!({ "count": 5, "flag": true }));
        assert_eq!(canonicalize_sorted(&body), "5true");
    }

    #[test]
    fn test_digest_is_deterministic_for_same_body() {
        let body = body(json!({ "amount": 1.0, "session": "S1" }));
        let first = hmac_sha256_hex(b"salt1", canonicalize_sorted(&body).as_bytes()).unwrap();
        let second = hmac_sha256_hex(b"salt1", canonicalize_sorted(&body).as_bytes()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_eq!(first, first.to_lowercase());
    }
}
