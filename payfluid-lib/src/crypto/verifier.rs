//! Inbound notification verification.
//!
//! Redirect and webhook notifications carry an `aapf_txn_signature`
//! computed by the gateway over the remaining payload values in the order
//! they were written. Verification recomputes that MAC keyed by a digest
//! of the originating session and compares in constant time. Only a
//! payload that passes comes back as a [`PaymentStatus`]; nothing from an
//! unverified payload is ever surfaced.

use serde_json::{Map, Value};
use subtle::ConstantTimeEq;
use tracing::debug;

use super::signer::value_fragment;
use super::{hmac_sha256_hex, session_mac_key};
use crate::status::PaymentStatus;
use crate::{PayFluidError, Result};

/// Signature key carried by every gateway notification payload.
pub const SIGNATURE_KEY: &str = "aapf_txn_signature";

/// An inbound payment notification, before verification.
#[derive(Clone, Debug)]
pub enum NotificationPayload {
    /// URL-encoded JSON text, as delivered in a redirect query parameter.
    RawText(String),
    /// An already-decoded JSON object, as delivered in a webhook body.
    Structured(Map<String, Value>),
}

impl NotificationPayload {
    fn into_map(self) -> Result<Map<String, Value>> {
        match self {
            Self::Structured(map) => Ok(map),
            Self::RawText(text) => {
                let decoded = urlencoding::decode(&text).map_err(|e| {
                    PayFluidError::decode(format!(
                        "notification payload is not valid UTF-8 after URL decoding: {e}"
                    ))
                })?;
                serde_json::from_str::<Map<String, Value>>(&decoded).map_err(|e| {
                    PayFluidError::decode(format!(
                        "notification payload is not a JSON object ({e}): {decoded}"
                    ))
                })
            }
        }
    }
}

/// Concatenate payload values in their delivered iteration order.
///
/// Inbound verification trusts the key order as the gateway wrote it.
/// This is distinct from the sorted rule used for outbound signing; the
/// two must never be unified.
pub fn canonicalize_delivered(payload: &Map<String, Value>) -> String {
    payload.values().map(value_fragment).collect()
}

/// Verify a payment notification against its embedded signature.
///
/// `session` is the token under which the payment link was created. The
/// comparison is case-insensitive and constant-time. On success the
/// payload is mapped into a [`PaymentStatus`]; a payload missing any
/// expected field fails rather than defaulting.
pub fn verify_payment(payload: NotificationPayload, session: &str) -> Result<PaymentStatus> {
    let mut payload = payload.into_map()?;

    let signature = match payload.shift_remove(SIGNATURE_KEY) {
        None => {
            return Err(PayFluidError::Verification(
                "payload carries no signature".into(),
            ))
        }
        Some(Value::String(s)) if s.is_empty() => {
            return Err(PayFluidError::Verification(
                "payload signature is empty".into(),
            ))
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(PayFluidError::Verification(
                "payload signature is not a string".into(),
            ))
        }
    };

    let canonical = canonicalize_delivered(&payload);
    let expected = hmac_sha256_hex(session_mac_key(session).as_bytes(), canonical.as_bytes())?;
    let provided = signature.to_ascii_lowercase();

    if !bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
        return Err(PayFluidError::Verification("signature is not valid".into()));
    }

    debug!("notification signature verified");
    PaymentStatus::from_payload(&payload, &signature)
}

/// Verify the URL-encoded JSON object delivered in a redirect query
/// parameter.
pub fn verify_redirect(query_value: &str, session: &str) -> Result<PaymentStatus> {
    verify_payment(NotificationPayload::RawText(query_value.to_string()), session)
}

/// Verify a webhook request body.
pub fn verify_webhook(body: &str, session: &str) -> Result<PaymentStatus> {
    let payload = serde_json::from_str::<Map<String, Value>>(body).map_err(|e| {
        PayFluidError::decode(format!("webhook body is not a JSON object ({e}): {body}"))
    })?;
    verify_payment(NotificationPayload::Structured(payload), session)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = "S1";

    /// Payload in gateway delivery order, without its signature.
    fn unsigned_payload() -> Map<String, Value> {
        let fields = [
            ("aapf_txn_amt", "1.0"),
            ("aapf_txn_redirectUrl", "https://merchant.example/return"),
            ("aapf_txn_callbackUrl", ""),
            ("aapf_txn_clientRef", "abc123"),
            ("aapf_txn_currency", "GHS"),
            ("aapf_txn_dateTime", "2024-05-01T10:00:00.000Z"),
            ("aapf_txn_gwRef", "GW-1"),
            ("aapf_txn_gwStatus", "APPROVED"),
            ("aapf_txn_maskedInstr", "024xxxx111"),
            ("aapf_txn_payRef", "abcref123"),
            ("aapf_txn_payScheme", "MTN"),
            ("aapf_txn_ref", "PF-77"),
            ("aapf_txn_sc", "0"),
            ("aapf_txn_sc_msg", "Success"),
        ];
        let mut map = Map::new();
        for (key, value) in fields {
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
        map
    }

    fn signed_payload() -> Map<String, Value> {
        let mut map = unsigned_payload();
        let signature = hmac_sha256_hex(
            session_mac_key(SESSION).as_bytes(),
            canonicalize_delivered(&map).as_bytes(),
        )
        .unwrap();
        map.insert(SIGNATURE_KEY.to_string(), Value::String(signature));
        map
    }

    #[test]
    fn test_valid_payload_verifies() {
        let status = verify_payment(NotificationPayload::Structured(signed_payload()), SESSION)
            .unwrap();
        assert_eq!(status.pay_reference, "abcref123");
        assert_eq!(status.status_code, "0");
        assert!(status.is_successful());
    }

    #[test]
    fn test_missing_signature_is_rejected() {
        let err = verify_payment(NotificationPayload::Structured(unsigned_payload()), SESSION)
            .unwrap_err();
        assert!(matches!(err, PayFluidError::Verification(_)));
        assert!(err.to_string().contains("no signature"));
    }

    #[test]
    fn test_empty_signature_is_rejected() {
        let mut map = unsigned_payload();
        map.insert(SIGNATURE_KEY.to_string(), Value::String(String::new()));
        let err = verify_payment(NotificationPayload::Structured(map), SESSION).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_tampered_field_is_rejected() {
        let mut map = signed_payload();
        map.insert("aapf_txn_amt".to_string(), Value::String("2.0".into()));
        let err = verify_payment(NotificationPayload::Structured(map), SESSION).unwrap_err();
        assert!(matches!(err, PayFluidError::Verification(_)));
    }

    #[test]
    fn test_wrong_session_is_rejected() {
        let err = verify_payment(NotificationPayload::Structured(signed_payload()), "S2")
            .unwrap_err();
        assert!(matches!(err, PayFluidError::Verification(_)));
    }

    #[test]
    fn test_signature_comparison_is_case_insensitive() {
        let mut map = unsigned_payload();
        let signature = hmac_sha256_hex(
            session_mac_key(SESSION).as_bytes(),
            canonicalize_delivered(&map).as_bytes(),
        )
        .unwrap()
        .to_uppercase();
        map.insert(SIGNATURE_KEY.to_string(), Value::String(signature));

        assert!(verify_payment(NotificationPayload::Structured(map), SESSION).is_ok());
    }

    #[test]
    fn test_delivered_order_changes_canonical_form() {
        let mut forward = Map::new();
        forward.insert("a".into(), Value::String("1".into()));
        forward.insert("b".into(), Value::String("2".into()));

        let mut reversed = Map::new();
        reversed.insert("b".into(), Value::String("2".into()));
        reversed.insert("a".into(), Value::String("1".into()));

        assert_eq!(canonicalize_delivered(&forward), "12");
        assert_eq!(canonicalize_delivered(&reversed), "21");
    }

    #[test]
    fn test_redirect_payload_round_trip() {
        let json = serde_json::to_string(&Value::Object(signed_payload())).unwrap();
        let encoded = urlencoding::encode(&json).into_owned();

        let status = verify_redirect(&encoded, SESSION).unwrap();
        assert_eq!(status.client_reference, "abc123");
    }

    #[test]
    fn test_webhook_body_round_trip() {
        let body = serde_json::to_string(&Value::Object(signed_payload())).unwrap();
        let status = verify_webhook(&body, SESSION).unwrap();
        assert_eq!(status.pay_scheme, "MTN");
    }

    #[test]
    fn test_non_object_payload_is_a_decode_error() {
        let err = verify_webhook("[1, 2, 3]", SESSION).unwrap_err();
        assert!(matches!(err, PayFluidError::Decode { .. }));
    }
}
