//! Payment-page customization.

use serde::Serialize;

use super::customer_input::CustomerInput;
use super::rules;
use crate::{PayFluidError, Result};

/// Upper bound on extra inputs the payment page will render.
const MAX_CUSTOMER_INPUTS: usize = 3;

fn default_expiry_days() -> i64 {
    3
}

/// Appearance and behavior overrides for the hosted payment page.
///
/// Serialized as the `customTxn` object of the payment-link request.
#[derive(Clone, Debug, Serialize)]
pub struct Customization {
    #[serde(rename = "editAmt")]
    edit_amount: bool,
    #[serde(rename = "minAmt", skip_serializing_if = "Option::is_none")]
    min_amount: Option<f64>,
    #[serde(rename = "maxAmt", skip_serializing_if = "Option::is_none")]
    max_amount: Option<f64>,
    #[serde(rename = "borderTheme", skip_serializing_if = "Option::is_none")]
    border_theme: Option<String>,
    #[serde(rename = "receiptMsg", skip_serializing_if = "Option::is_none")]
    receipt_message: Option<String>,
    #[serde(rename = "receiptFeedbackPhone", skip_serializing_if = "Option::is_none")]
    receipt_feedback_phone: Option<String>,
    #[serde(rename = "receiptFeedbackEmail", skip_serializing_if = "Option::is_none")]
    receipt_feedback_email: Option<String>,
    #[serde(rename = "payLinkExpiryInDays")]
    pay_link_expiry_in_days: i64,
    #[serde(rename = "payLinkCanPayMultipleTimes")]
    can_pay_multiple_times: bool,
    #[serde(rename = "displayPicture", skip_serializing_if = "Option::is_none")]
    display_picture: Option<String>,
    #[serde(rename = "customerInput", skip_serializing_if = "Vec::is_empty")]
    customer_inputs: Vec<CustomerInput>,
}

impl Customization {
    /// Start building a customization.
    pub fn builder() -> CustomizationBuilder {
        CustomizationBuilder::default()
    }

    /// Render the `customTxn` JSON string for the request body.
    pub(crate) fn to_body_value(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| PayFluidError::decode(format!("failed to serialize customization: {e}")))
    }

    /// Lower amount bound shown to the customer, if set.
    pub fn min_amount(&self) -> Option<f64> {
        self.min_amount
    }

    /// Upper amount bound shown to the customer, if set.
    pub fn max_amount(&self) -> Option<f64> {
        self.max_amount
    }

    /// Days until the link expires.
    pub fn pay_link_expiry_in_days(&self) -> i64 {
        self.pay_link_expiry_in_days
    }

    /// Inputs added to the payment page.
    pub fn customer_inputs(&self) -> &[CustomerInput] {
        &self.customer_inputs
    }
}

/// Builder for [`Customization`]; setters fail fast on invalid values.
#[derive(Debug)]
pub struct CustomizationBuilder {
    edit_amount: bool,
    min_amount: Option<f64>,
    max_amount: Option<f64>,
    border_theme: Option<String>,
    receipt_message: Option<String>,
    receipt_feedback_phone: Option<String>,
    receipt_feedback_email: Option<String>,
    pay_link_expiry_in_days: i64,
    can_pay_multiple_times: bool,
    display_picture: Option<String>,
    customer_inputs: Vec<CustomerInput>,
}

impl Default for CustomizationBuilder {
    fn default() -> Self {
        Self {
            edit_amount: false,
            min_amount: None,
            max_amount: None,
            border_theme: None,
            receipt_message: None,
            receipt_feedback_phone: None,
            receipt_feedback_email: None,
            pay_link_expiry_in_days: default_expiry_days(),
            can_pay_multiple_times: false,
            display_picture: None,
            customer_inputs: Vec::new(),
        }
    }
}

impl CustomizationBuilder {
    /// Let the customer edit the amount on the payment page.
    pub fn edit_amount(mut self, editable: bool) -> Self {
        self.edit_amount = editable;
        self
    }

    /// Set the minimum editable amount; must not exceed an already-set
    /// maximum.
    pub fn minimum_amount(mut self, amount: f64) -> Result<Self> {
        rules::require_positive_amount("min_amount", amount)?;
        if let Some(max) = self.max_amount {
            if amount > max {
                return Err(PayFluidError::validation(
                    "min_amount",
                    format!("must not exceed the maximum amount {max}"),
                ));
            }
        }
        self.min_amount = Some(amount);
        Ok(self)
    }

    /// Set the maximum editable amount; must not undercut an already-set
    /// minimum.
    pub fn maximum_amount(mut self, amount: f64) -> Result<Self> {
        rules::require_positive_amount("max_amount", amount)?;
        if let Some(min) = self.min_amount {
            if amount < min {
                return Err(PayFluidError::validation(
                    "max_amount",
                    format!("must not undercut the minimum amount {min}"),
                ));
            }
        }
        self.max_amount = Some(amount);
        Ok(self)
    }

    /// Set the page border color, a 3- or 6-digit `#`-prefixed hex value.
    pub fn border_theme(mut self, color: impl Into<String>) -> Result<Self> {
        let color = color.into();
        rules::require_hex_color("border_theme", &color)?;
        self.border_theme = Some(color);
        Ok(self)
    }

    /// Set the message printed on the customer's receipt.
    pub fn receipt_message(mut self, message: impl Into<String>) -> Self {
        self.receipt_message = Some(message.into());
        self
    }

    /// Set the phone number receipt feedback is sent to.
    pub fn receipt_feedback_phone(mut self, phone: impl Into<String>) -> Result<Self> {
        let phone = phone.into();
        rules::require_phone("receipt_feedback_phone", &phone)?;
        self.receipt_feedback_phone = Some(phone);
        Ok(self)
    }

    /// Set the email address receipt feedback is sent to.
    pub fn receipt_feedback_email(mut self, email: impl Into<String>) -> Result<Self> {
        let email = email.into();
        rules::require_email("receipt_feedback_email", &email)?;
        self.receipt_feedback_email = Some(email);
        Ok(self)
    }

    /// Set how many days the link stays payable.
    pub fn pay_link_expiry_in_days(mut self, days: i64) -> Result<Self> {
        if days <= 0 {
            return Err(PayFluidError::validation(
                "pay_link_expiry_in_days",
                "must be positive",
            ));
        }
        self.pay_link_expiry_in_days = days;
        Ok(self)
    }

    /// Allow the link to be paid more than once.
    pub fn can_pay_multiple_times(mut self, multiple: bool) -> Self {
        self.can_pay_multiple_times = multiple;
        self
    }

    /// Set the picture shown on the payment page.
    pub fn display_picture(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        rules::require_url("display_picture", &url)?;
        self.display_picture = Some(url);
        Ok(self)
    }

    /// Add an extra input field to the payment page.
    pub fn customer_input(mut self, input: CustomerInput) -> Result<Self> {
        if self.customer_inputs.len() >= MAX_CUSTOMER_INPUTS {
            return Err(PayFluidError::validation(
                "customer_inputs",
                format!("at most {MAX_CUSTOMER_INPUTS} inputs are allowed"),
            ));
        }
        self.customer_inputs.push(input);
        Ok(self)
    }

    /// Finalize the customization.
    pub fn build(self) -> Result<Customization> {
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(PayFluidError::validation(
                    "min_amount",
                    format!("must not exceed the maximum amount {max}"),
                ));
            }
        }
        Ok(Customization {
            edit_amount: self.edit_amount,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            border_theme: self.border_theme,
            receipt_message: self.receipt_message,
            receipt_feedback_phone: self.receipt_feedback_phone,
            receipt_feedback_email: self.receipt_feedback_email,
            pay_link_expiry_in_days: self.pay_link_expiry_in_days,
            can_pay_multiple_times: self.can_pay_multiple_times,
            display_picture: self.display_picture,
            customer_inputs: self.customer_inputs,
        })
    }
}
