//! Cryptographic primitives shared by request signing and notification
//! verification.
//!
//! Outbound requests are signed by HMAC-SHA256 over a canonical rendering
//! of the body, with the hex digest then RSA-encrypted under the
//! session's public key ([`signer`]). Inbound notifications are verified
//! by recomputing an HMAC keyed by a digest of the session token and
//! comparing in constant time ([`verifier`]). The two canonicalizations
//! differ deliberately and must stay separate.

pub mod signer;
pub mod verifier;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Encrypt, RsaPublicKey};
use sha2::Sha256;

use crate::{PayFluidError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Load an RSA public key from PEM text or single-line base64 DER.
///
/// The gateway delivers key material as base64 DER in the KEK header;
/// PEM is accepted for caller-supplied keys. Both SPKI and PKCS#1 layouts
/// are understood.
pub(crate) fn load_rsa_public_key(material: &str) -> Result<RsaPublicKey> {
    let material = material.trim();
    if material.is_empty() {
        return Err(PayFluidError::Crypto("RSA key material is empty".into()));
    }

    if material.contains("-----BEGIN") {
        if let Ok(key) = RsaPublicKey::from_public_key_pem(material) {
            return Ok(key);
        }
        return RsaPublicKey::from_pkcs1_pem(material)
            .map_err(|e| PayFluidError::Crypto(format!("failed to load RSA public key: {e}")));
    }

    let der = BASE64
        .decode(material.as_bytes())
        .map_err(|e| PayFluidError::Crypto(format!("RSA key material is not valid base64: {e}")))?;
    if let Ok(key) = RsaPublicKey::from_public_key_der(&der) {
        return Ok(key);
    }
    RsaPublicKey::from_pkcs1_der(&der)
        .map_err(|e| PayFluidError::Crypto(format!("failed to load RSA public key: {e}")))
}

/// RSA-PKCS#1 v1.5 encrypt `plaintext` under `key_material`, base64-encoded.
pub(crate) fn rsa_encrypt_b64(key_material: &str, plaintext: &[u8]) -> Result<String> {
    let key = load_rsa_public_key(key_material)?;
    let mut rng = rand::rngs::OsRng;
    let ciphertext = key
        .encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)
        .map_err(|e| PayFluidError::Crypto(format!("RSA encryption failed: {e}")))?;
    Ok(BASE64.encode(ciphertext))
}

/// Lower-case hex HMAC-SHA256 of `data` keyed by `key`.
pub(crate) fn hmac_sha256_hex(key: &[u8], data: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| PayFluidError::Crypto(format!("invalid HMAC key: {e}")))?;
    mac.update(data);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Derive the notification MAC key from a session token.
///
/// The gateway keys inbound signatures with the lower-case hex MD5 digest
/// of the session string. MD5 is key derivation only here; integrity
/// rests entirely on the HMAC-SHA256 comparison. Must not change, for
/// wire compatibility.
pub(crate) fn session_mac_key(session: &str) -> String {
    format!("{:x}", md5::compute(session.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_mac_key_is_hex_md5() {
        assert_eq!(session_mac_key(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(session_mac_key("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_hmac_sha256_rfc4231_vector() {
        // RFC 4231 test case 2
        let digest =
            hmac_sha256_hex(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            digest,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_load_rejects_empty_and_garbage_material() {
        assert!(load_rsa_public_key("").is_err());
        assert!(load_rsa_public_key("   ").is_err());
        assert!(load_rsa_public_key("not base64 !!!").is_err());
        // valid base64, not a key
        assert!(load_rsa_public_key("aGVsbG8=").is_err());
    }

    #[test]
    fn test_encrypt_fails_on_bad_key() {
        let err = rsa_encrypt_b64("garbage", b"payload").unwrap_err();
        assert!(matches!(err, PayFluidError::Crypto(_)));
    }
}
