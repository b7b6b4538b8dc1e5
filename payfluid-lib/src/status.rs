//! Result objects returned by the gateway.

use serde_json::{Map, Value};

use crate::crypto::signer::value_fragment;
use crate::{PayFluidError, Result};

/// A successfully created hosted payment link.
///
/// Immutable snapshot of the gateway's payment-link response.
#[derive(Clone, Debug)]
pub struct PaymentLink {
    /// Approval code for this link.
    pub approval_code: String,
    /// Gateway result message.
    pub result_message: String,
    /// Hosted payment page URL to hand to the customer.
    pub web_url: String,
    /// Session the link was created under.
    pub session: String,
    /// Gateway result code ("00" on success).
    pub result_code: String,
    /// Identifier of this link, derived from the final path segment of
    /// `web_url`; used for status polls.
    pub pay_reference: String,
}

impl PaymentLink {
    pub(crate) fn new(
        approval_code: String,
        result_message: String,
        web_url: String,
        session: String,
        result_code: String,
    ) -> Self {
        let pay_reference = web_url.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            approval_code,
            result_message,
            web_url,
            session,
            result_code,
            pay_reference,
        }
    }
}

/// Verified payment status, mirroring the gateway's `aapf_txn_*` payload.
///
/// Only produced after signature verification succeeds. A payload missing
/// any expected field fails decoding instead of defaulting: a status
/// report with holes is unsafe to trust.
#[derive(Clone, Debug)]
pub struct PaymentStatus {
    /// Transaction amount.
    pub amount: String,
    /// Redirect URL the customer was sent back to.
    pub redirect_url: String,
    /// Callback URL registered for the transaction, if any.
    pub callback_url: String,
    /// Merchant-supplied transaction reference.
    pub client_reference: String,
    /// Transaction currency.
    pub currency: String,
    /// Gateway timestamp of the transaction.
    pub date_time: String,
    /// Upstream gateway reference.
    pub gateway_reference: String,
    /// Upstream gateway status.
    pub gateway_status: String,
    /// Masked payment instrument (e.g. a truncated wallet number).
    pub masked_instrument: String,
    /// Payment-link reference.
    pub pay_reference: String,
    /// Scheme the customer paid with.
    pub pay_scheme: String,
    /// Gateway-assigned transaction reference.
    pub payfluid_reference: String,
    /// Status code: "0" (or "00") means success.
    pub status_code: String,
    /// Human-readable explanation of `status_code`.
    pub status_string: String,
    /// Signature the payload was verified against.
    pub signature: String,
}

impl PaymentStatus {
    /// Map a verified payload into a status snapshot.
    ///
    /// `payload` must already have had its signature key removed and
    /// verified by the caller.
    pub(crate) fn from_payload(payload: &Map<String, Value>, signature: &str) -> Result<Self> {
        Ok(Self {
            amount: field(payload, "aapf_txn_amt")?,
            redirect_url: field(payload, "aapf_txn_redirectUrl")?,
            callback_url: field(payload, "aapf_txn_callbackUrl")?,
            client_reference: field(payload, "aapf_txn_clientRef")?,
            currency: field(payload, "aapf_txn_currency")?,
            date_time: field(payload, "aapf_txn_dateTime")?,
            gateway_reference: field(payload, "aapf_txn_gwRef")?,
            gateway_status: field(payload, "aapf_txn_gwStatus")?,
            masked_instrument: field(payload, "aapf_txn_maskedInstr")?,
            pay_reference: field(payload, "aapf_txn_payRef")?,
            pay_scheme: field(payload, "aapf_txn_payScheme")?,
            payfluid_reference: field(payload, "aapf_txn_ref")?,
            status_code: field(payload, "aapf_txn_sc")?,
            status_string: field(payload, "aapf_txn_sc_msg")?,
            signature: signature.to_string(),
        })
    }

    /// Whether the transaction completed successfully.
    ///
    /// Any code other than "0"/"00" is a failure explained by
    /// [`status_string`](Self::status_string).
    pub fn is_successful(&self) -> bool {
        self.status_code == "0" || self.status_code == "00"
    }
}

fn field(payload: &Map<String, Value>, key: &str) -> Result<String> {
    payload
        .get(key)
        .map(value_fragment)
        .ok_or_else(|| PayFluidError::decode(format!("status payload is missing {key}")))
}
