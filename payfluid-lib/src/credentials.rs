//! Session credentials issued by the secure-credentials endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cryptographic material scoping one checkout session.
///
/// Issued by [`crate::PayFluid::get_secure_credentials`] and handed back
/// by the caller for subsequent signed operations. Immutable once
/// constructed. Expiry is informational only: the library does not
/// auto-refresh, and callers must request fresh credentials once either
/// marker has passed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecureCredentials {
    /// Opaque per-customer session token.
    pub session: String,

    /// RSA public key encrypting outbound request signatures.
    pub rsa_public_key: String,

    /// Salt keying the HMAC-SHA256 over outbound request bodies.
    pub sha256_salt: String,

    /// Expiry marker for the RSA key material.
    pub kek_expiry: i64,

    /// Expiry marker for the MAC salt.
    pub mac_expiry: i64,

    /// Approval code issued alongside the session.
    pub approval_code: String,
}

impl SecureCredentials {
    /// Whether either piece of key material has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let ts = now.timestamp();
        ts >= self.kek_expiry || ts >= self.mac_expiry
    }
}
