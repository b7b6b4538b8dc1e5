//! PayFluid client library.
//!
//! This crate talks to the PayFluid payment gateway: it obtains signed
//! session credentials, builds and signs payment-link requests, polls
//! payment status, and verifies inbound payment notifications (redirect
//! or webhook) against their embedded signature.
//!
//! The crate stays stateless between calls. Callers own the returned
//! [`SecureCredentials`] and reference values and hand them back for
//! subsequent signed operations; nothing is persisted or refreshed behind
//! their back.
//!
//! # Example
//!
//! ```ignore
//! use payfluid_lib::{Environment, PayFluid, PayFluidConfig, Payment};
//!
//! let config = PayFluidConfig::new("client-id", api_key_pem, "login-parameter")
//!     .with_environment(Environment::Test);
//! let client = PayFluid::new(config)?;
//!
//! let credentials = client.get_secure_credentials("0241111111").await?;
//!
//! let payment = Payment::builder()
//!     .amount(1.0)?
//!     .email("jane@example.com")?
//!     .phone("0241111111")?
//!     .name("Jane")?
//!     .reference("abc123")?
//!     .redirect_url("https://merchant.example/return")?
//!     .build()?;
//!
//! let link = client.get_payment_link(&credentials, &payment).await?;
//! println!("pay at {}", link.web_url);
//!
//! // Later, on the webhook:
//! let status = payfluid_lib::verify_webhook(&body, &credentials.session)?;
//! assert!(status.is_successful());
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod crypto;
pub mod errors;
pub mod payment;
pub mod status;

pub use client::PayFluid;
pub use config::{Environment, PayFluidConfig};
pub use credentials::SecureCredentials;
pub use crypto::verifier::{verify_payment, verify_redirect, verify_webhook, NotificationPayload};
pub use errors::PayFluidError;
pub use payment::{
    CustomerInput, CustomerInputBuilder, Customization, CustomizationBuilder, InputOption,
    InputType, Payment, PaymentBuilder,
};
pub use status::{PaymentLink, PaymentStatus};

/// Common result alias for PayFluid operations.
pub type Result<T> = std::result::Result<T, PayFluidError>;
