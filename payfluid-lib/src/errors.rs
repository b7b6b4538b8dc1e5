//! Error types for PayFluid operations.
//!
//! Every public operation either returns a fully-populated, verified
//! result object or fails with one of these variants. Partial results are
//! never surfaced, and error messages never carry key material, salts, or
//! session tokens.

use thiserror::Error;

/// Comprehensive error type for PayFluid operations.
#[derive(Debug, Error)]
pub enum PayFluidError {
    /// A request field failed local validation before any network call.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Transport/network layer error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Connection failed.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed {
        /// Target endpoint
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// A response or payload could not be decoded.
    #[error("decode error: {context}")]
    Decode {
        /// What was being decoded, with raw body context for diagnosis
        context: String,
    },

    /// The gateway returned a non-success result code.
    #[error("gateway error {code}: {message}")]
    Remote {
        /// Service-supplied result code
        code: String,
        /// Service-supplied explanation
        message: String,
    },

    /// Key material failed to load, or a cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// An inbound payload failed signature verification.
    ///
    /// Treat this as a security event: reject the payment status and do
    /// not trust any field of the payload.
    #[error("verification failed: {0}")]
    Verification(String),
}

impl PayFluidError {
    /// Create a validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(context: impl Into<String>) -> Self {
        Self::Decode {
            context: context.into(),
        }
    }

    /// Create a remote error from a gateway result code and message.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error is potentially recoverable by retrying.
    ///
    /// The library never retries on its own; callers deciding to retry
    /// should use a fresh payment reference per attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionTimeout { .. } | Self::ConnectionFailed { .. }
        )
    }
}

impl From<serde_json::Error> for PayFluidError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            context: err.to_string(),
        }
    }
}
