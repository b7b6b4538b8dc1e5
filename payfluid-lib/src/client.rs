//! PayFluid API client.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::PayFluidConfig;
use crate::credentials::SecureCredentials;
use crate::crypto::verifier::{self, NotificationPayload};
use crate::crypto::{self, signer};
use crate::payment::Payment;
use crate::status::{PaymentLink, PaymentStatus};
use crate::{PayFluidError, Result};

/// Timestamp format of the credential request.
const CREDENTIAL_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Command name of the secure-credentials call.
const SECURE_PARAMS_CMD: &str = "getSecureParams";

/// Client for the PayFluid payment gateway.
///
/// Construction builds one HTTP client with the configured timeout; the
/// client holds no session state, so one instance may serve concurrent
/// tasks.
#[derive(Clone)]
pub struct PayFluid {
    config: PayFluidConfig,
    client: reqwest::Client,
}

impl PayFluid {
    /// Create a new client from the given configuration.
    pub fn new(config: PayFluidConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PayFluidError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Get the configuration.
    pub fn config(&self) -> &PayFluidConfig {
        &self.config
    }

    /// Obtain session credentials and cryptographic material for a
    /// customer.
    ///
    /// The returned [`SecureCredentials`] scope subsequent signed calls;
    /// the caller keeps them until expiry and requests new ones after.
    pub async fn get_secure_credentials(&self, phone_number: &str) -> Result<SecureCredentials> {
        if phone_number.trim().is_empty() {
            return Err(PayFluidError::validation("phone_number", "must not be empty"));
        }

        let timestamp = Utc::now().format(CREDENTIAL_TIMESTAMP_FORMAT).to_string();
        let token = crypto::rsa_encrypt_b64(
            &self.config.api_key,
            format!("{}.{}", self.config.login_parameter, timestamp).as_bytes(),
        )?;

        let url = self.config.secure_credentials_url();
        debug!(%url, "requesting secure credentials");
        let response = self
            .client
            .post(&url)
            .header("id", BASE64.encode(self.config.client_id.as_bytes()))
            .header("apiKey", token)
            .json(&json!({
                "cmd": SECURE_PARAMS_CMD,
                "datetime": timestamp,
                "mobile": phone_number,
            }))
            .send()
            .await
            .map_err(|e| self.map_reqwest_error("secure credentials request", e))?;

        let (rsa_public_key, sha256_salt) = extract_kek(response.headers())?;
        let body: SecureCredentialsResponse =
            decode_response(response, "secure credentials").await?;
        if body.result_code != "00" {
            warn!(code = %body.result_code, "secure credentials request rejected");
            return Err(PayFluidError::remote(body.result_code, body.result_message));
        }

        Ok(SecureCredentials {
            session: body.session,
            rsa_public_key,
            sha256_salt,
            kek_expiry: body.kek_expiry,
            mac_expiry: body.mac_expiry,
            approval_code: body.approval_code,
        })
    }

    /// Create a hosted payment link for a validated payment.
    pub async fn get_payment_link(
        &self,
        credentials: &SecureCredentials,
        payment: &Payment,
    ) -> Result<PaymentLink> {
        if credentials.session.is_empty() {
            return Err(PayFluidError::validation(
                "credentials",
                "session must not be empty",
            ));
        }

        let body = payment.to_body(&credentials.session)?;
        let signature = signer::sign(credentials, &body)?;

        let url = self.config.pay_link_url();
        debug!(%url, reference = %payment.reference(), "requesting payment link");
        let response = self
            .client
            .post(&url)
            .header("signature", signature)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error("payment link request", e))?;

        let body: PayLinkResponse = decode_response(response, "payment link").await?;
        if body.result_code != "00" {
            warn!(code = %body.result_code, "payment link request rejected");
            return Err(PayFluidError::remote(body.result_code, body.result_message));
        }

        Ok(PaymentLink::new(
            body.approval_code,
            body.result_message,
            body.web_url,
            body.session,
            body.result_code,
        ))
    }

    /// Poll the status of a payment link.
    ///
    /// The response is itself a signed notification payload and goes
    /// through full signature verification before any field is trusted.
    pub async fn get_payment_status(
        &self,
        pay_reference: &str,
        session: &str,
    ) -> Result<PaymentStatus> {
        if pay_reference.trim().is_empty() {
            return Err(PayFluidError::validation("pay_reference", "must not be empty"));
        }
        if session.trim().is_empty() {
            return Err(PayFluidError::validation("session", "must not be empty"));
        }

        let url = self.config.status_url();
        debug!(%url, "polling payment status");
        let response = self
            .client
            .get(&url)
            .header("payReference", pay_reference)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error("status poll", e))?;

        let payload: Map<String, Value> = decode_response(response, "payment status").await?;
        verifier::verify_payment(NotificationPayload::Structured(payload), session)
    }

    fn map_reqwest_error(&self, operation: &str, e: reqwest::Error) -> PayFluidError {
        if e.is_timeout() {
            PayFluidError::ConnectionTimeout {
                operation: operation.to_string(),
                timeout_ms: self.config.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            PayFluidError::ConnectionFailed {
                target: self.config.base_url().to_string(),
                reason: e.to_string(),
            }
        } else {
            PayFluidError::Transport(format!("{operation} failed: {e}"))
        }
    }
}

/// Recover the RSA public key and HMAC salt from the KEK response header.
///
/// The gateway is not consistent about the header name's casing, so every
/// header whose name contains `kek` is considered. A response without one
/// is a hard failure: credentials with empty key material are unusable
/// for signing and must never be returned.
fn extract_kek(headers: &HeaderMap) -> Result<(String, String)> {
    // HeaderName normalizes to lowercase
    let value = headers
        .iter()
        .find(|(name, _)| name.as_str().contains("kek"))
        .map(|(_, value)| value)
        .ok_or_else(|| {
            PayFluidError::Crypto("secure credentials response carried no KEK header".into())
        })?;
    let value = value.to_str().map_err(|_| {
        PayFluidError::Crypto("KEK header value is not valid ASCII".into())
    })?;

    match value.split_once('.') {
        Some((key, salt)) if !key.is_empty() && !salt.is_empty() => {
            Ok((key.to_string(), salt.to_string()))
        }
        _ => Err(PayFluidError::Crypto(
            "KEK header does not contain '<rsaPublicKey>.<sha256Salt>'".into(),
        )),
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T> {
    let status = response.status();
    let text = response.text().await.map_err(|e| {
        PayFluidError::Transport(format!("failed to read {context} response: {e}"))
    })?;

    if !status.is_success() {
        return Err(PayFluidError::remote(status.as_u16().to_string(), text));
    }

    serde_json::from_str(&text).map_err(|e| {
        PayFluidError::decode(format!("{context} response is not valid JSON ({e}): {text}"))
    })
}

#[derive(Debug, Deserialize)]
struct SecureCredentialsResponse {
    #[serde(rename = "resultCode")]
    result_code: String,
    #[serde(rename = "resultMessage", default)]
    result_message: String,
    #[serde(default)]
    session: String,
    #[serde(rename = "kekExpiry", default)]
    kek_expiry: i64,
    #[serde(rename = "macExpiry", default)]
    mac_expiry: i64,
    #[serde(rename = "approvalCode", default)]
    approval_code: String,
}

#[derive(Debug, Deserialize)]
struct PayLinkResponse {
    result_code: String,
    #[serde(default)]
    result_message: String,
    #[serde(rename = "approvalCode", default)]
    approval_code: String,
    #[serde(default)]
    session: String,
    #[serde(rename = "webURL", default)]
    web_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn test_extract_kek_splits_on_first_dot() {
        let headers = headers_with("kek", "PUBKEY.salt.with.dots");
        let (key, salt) = extract_kek(&headers).unwrap();
        assert_eq!(key, "PUBKEY");
        assert_eq!(salt, "salt.with.dots");
    }

    #[test]
    fn test_extract_kek_matches_name_substring() {
        let headers = headers_with("x-kek-material", "PUBKEY.salt");
        assert!(extract_kek(&headers).is_ok());
    }

    #[test]
    fn test_missing_kek_header_is_a_hard_failure() {
        let headers = headers_with("content-type", "application/json");
        let err = extract_kek(&headers).unwrap_err();
        assert!(matches!(err, PayFluidError::Crypto(_)));
        assert!(err.to_string().contains("no KEK header"));
    }

    #[test]
    fn test_malformed_kek_header_is_rejected() {
        assert!(extract_kek(&headers_with("kek", "no-dot-here")).is_err());
        assert!(extract_kek(&headers_with("kek", ".saltonly")).is_err());
        assert!(extract_kek(&headers_with("kek", "keyonly.")).is_err());
    }
}
