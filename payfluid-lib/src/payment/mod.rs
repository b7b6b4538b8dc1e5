//! Payment request value objects and their validation rules.
//!
//! A [`Payment`] is built through [`PaymentBuilder`]: setters validate
//! their field immediately and fail fast, and [`PaymentBuilder::build`]
//! runs the presence and cross-field checks exactly once before freezing
//! the value. A `Payment` that exists has passed every rule.

mod customer_input;
mod customization;
pub(crate) mod rules;

pub use customer_input::{CustomerInput, CustomerInputBuilder, InputOption, InputType};
pub use customization::{Customization, CustomizationBuilder};

use chrono::Utc;
use serde_json::{Map, Value};

use crate::{PayFluidError, Result};

/// Longest accepted payment description.
const MAX_DESCRIPTION_CHARS: usize = 40;

/// Timestamp format of the `datetime` body field.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A validated, immutable payment-link request.
#[derive(Clone, Debug)]
pub struct Payment {
    amount: f64,
    currency: String,
    date_time: String,
    email: String,
    phone: String,
    name: String,
    reference: String,
    redirect_url: String,
    lang: String,
    description: Option<String>,
    other_info: Option<String>,
    callback_url: Option<String>,
    customization: Option<Customization>,
}

impl Payment {
    /// Start building a payment.
    pub fn builder() -> PaymentBuilder {
        PaymentBuilder::default()
    }

    /// Transaction amount.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Transaction currency.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Request timestamp, derived when the payment was built.
    pub fn date_time(&self) -> &str {
        &self.date_time
    }

    /// Customer email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Customer mobile number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Customer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Merchant transaction reference; should be unique per transaction.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// URL the customer is redirected to after payment.
    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    /// Payment page language.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Optional description shown on the payment page.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Optional free-form information attached to the transaction.
    pub fn other_info(&self) -> Option<&str> {
        self.other_info.as_deref()
    }

    /// Optional server-to-server status callback URL.
    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    /// Optional payment-page customization.
    pub fn customization(&self) -> Option<&Customization> {
        self.customization.as_ref()
    }

    /// Build the request body for the payment-link call.
    ///
    /// Keys are inserted in ascending order so the serialized JSON matches
    /// the canonical order the signature is computed over.
    pub(crate) fn to_body(&self, session: &str) -> Result<Map<String, Value>> {
        let mut body = Map::new();
        body.insert("amount".into(), Value::from(self.amount));
        body.insert("currency".into(), Value::from(self.currency.as_str()));
        if let Some(customization) = &self.customization {
            body.insert("customTxn".into(), Value::from(customization.to_body_value()?));
        }
        body.insert("datetime".into(), Value::from(self.date_time.as_str()));
        if let Some(description) = &self.description {
            body.insert("descr".into(), Value::from(description.as_str()));
        }
        body.insert("email".into(), Value::from(self.email.as_str()));
        body.insert("lang".into(), Value::from(self.lang.as_str()));
        body.insert("mobile".into(), Value::from(self.phone.as_str()));
        body.insert("name".into(), Value::from(self.name.as_str()));
        if let Some(other_info) = &self.other_info {
            body.insert("otherInfo".into(), Value::from(other_info.as_str()));
        }
        body.insert("reference".into(), Value::from(self.reference.as_str()));
        body.insert(
            "responseRedirectURL".into(),
            Value::from(self.redirect_url.as_str()),
        );
        body.insert("session".into(), Value::from(session));
        if let Some(callback_url) = &self.callback_url {
            body.insert("trxStatusCallbackURL".into(), Value::from(callback_url.as_str()));
        }
        Ok(body)
    }
}

/// Builder for [`Payment`]; setters fail fast on invalid values.
#[derive(Debug)]
pub struct PaymentBuilder {
    amount: Option<f64>,
    currency: String,
    email: Option<String>,
    phone: Option<String>,
    name: Option<String>,
    reference: Option<String>,
    redirect_url: Option<String>,
    lang: String,
    description: Option<String>,
    other_info: Option<String>,
    callback_url: Option<String>,
    customization: Option<Customization>,
}

impl Default for PaymentBuilder {
    fn default() -> Self {
        Self {
            amount: None,
            currency: "GHS".to_string(),
            email: None,
            phone: None,
            name: None,
            reference: None,
            redirect_url: None,
            lang: "en".to_string(),
            description: None,
            other_info: None,
            callback_url: None,
            customization: None,
        }
    }
}

impl PaymentBuilder {
    /// Set the amount; must be a strictly positive finite value.
    pub fn amount(mut self, amount: f64) -> Result<Self> {
        rules::require_positive_amount("amount", amount)?;
        self.amount = Some(amount);
        Ok(self)
    }

    /// Set the currency (default `"GHS"`).
    pub fn currency(mut self, currency: impl Into<String>) -> Result<Self> {
        let currency = currency.into();
        rules::require_non_empty("currency", &currency)?;
        self.currency = currency;
        Ok(self)
    }

    /// Set the customer email address.
    pub fn email(mut self, email: impl Into<String>) -> Result<Self> {
        let email = email.into();
        rules::require_email("email", &email)?;
        self.email = Some(email);
        Ok(self)
    }

    /// Set the customer mobile number: digits only, at least 10.
    pub fn phone(mut self, phone: impl Into<String>) -> Result<Self> {
        let phone = phone.into();
        rules::require_phone("phone", &phone)?;
        self.phone = Some(phone);
        Ok(self)
    }

    /// Set the customer name.
    pub fn name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        rules::require_non_empty("name", &name)?;
        self.name = Some(name);
        Ok(self)
    }

    /// Set the transaction reference: alphanumeric, at most 10
    /// characters, unique per transaction.
    pub fn reference(mut self, reference: impl Into<String>) -> Result<Self> {
        let reference = reference.into();
        rules::require_reference(&reference)?;
        self.reference = Some(reference);
        Ok(self)
    }

    /// Set the URL the customer returns to after payment.
    pub fn redirect_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        rules::require_url("redirect_url", &url)?;
        self.redirect_url = Some(url);
        Ok(self)
    }

    /// Set the payment page language (default `"en"`).
    pub fn lang(mut self, lang: impl Into<String>) -> Result<Self> {
        let lang = lang.into();
        rules::require_non_empty("lang", &lang)?;
        self.lang = lang;
        Ok(self)
    }

    /// Set the description shown on the payment page; at most 40
    /// characters.
    pub fn description(mut self, description: impl Into<String>) -> Result<Self> {
        let description = description.into();
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(PayFluidError::validation(
                "description",
                format!("must be at most {MAX_DESCRIPTION_CHARS} characters"),
            ));
        }
        self.description = Some(description);
        Ok(self)
    }

    /// Attach free-form information to the transaction.
    pub fn other_info(mut self, info: impl Into<String>) -> Self {
        self.other_info = Some(info.into());
        self
    }

    /// Set the server-to-server status callback URL; must differ from the
    /// redirect URL.
    pub fn callback_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        rules::require_url("callback_url", &url)?;
        self.callback_url = Some(url);
        Ok(self)
    }

    /// Attach a payment-page customization.
    pub fn customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }

    /// Finalize the payment: presence checks in a fixed order, then
    /// cross-field invariants, then the derived timestamp.
    pub fn build(self) -> Result<Payment> {
        let amount = self
            .amount
            .ok_or_else(|| PayFluidError::validation("amount", "must be set"))?;
        rules::require_non_empty("currency", &self.currency)?;
        let date_time = Utc::now().format(DATE_TIME_FORMAT).to_string();
        let email = self
            .email
            .ok_or_else(|| PayFluidError::validation("email", "must be set"))?;
        let phone = self
            .phone
            .ok_or_else(|| PayFluidError::validation("phone", "must be set"))?;
        let name = self
            .name
            .ok_or_else(|| PayFluidError::validation("name", "must be set"))?;
        let reference = self
            .reference
            .ok_or_else(|| PayFluidError::validation("reference", "must be set"))?;
        let redirect_url = self
            .redirect_url
            .ok_or_else(|| PayFluidError::validation("redirect_url", "must be set"))?;
        if let Some(callback_url) = &self.callback_url {
            if *callback_url == redirect_url {
                return Err(PayFluidError::validation(
                    "callback_url",
                    "must differ from the redirect URL",
                ));
            }
        }

        Ok(Payment {
            amount,
            currency: self.currency,
            date_time,
            email,
            phone,
            name,
            reference,
            redirect_url,
            lang: self.lang,
            description: self.description,
            other_info: self.other_info,
            callback_url: self.callback_url,
            customization: self.customization,
        })
    }
}
