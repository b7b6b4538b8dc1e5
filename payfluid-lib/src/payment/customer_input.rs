//! Extra input fields rendered on the hosted payment page.

use serde::Serialize;

use super::rules;
use crate::{PayFluidError, Result};

/// Kind of control rendered for a customer input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputType {
    /// Free-text field.
    #[default]
    Text,
    /// Dropdown; requires at least one option.
    Select,
}

impl InputType {
    /// Get the wire name of this input type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Select => "SELECT",
        }
    }
}

/// One key/value option of a SELECT input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputOption {
    /// Option key; must not be empty.
    pub key: String,
    /// Display value.
    pub value: String,
}

/// An extra form field collected from the customer on the payment page.
#[derive(Clone, Debug, Serialize)]
pub struct CustomerInput {
    label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    placeholder: String,
    #[serde(rename = "type")]
    input_type: InputType,
    required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<InputOption>,
}

impl CustomerInput {
    /// Start building a customer input.
    pub fn builder() -> CustomerInputBuilder {
        CustomerInputBuilder::default()
    }

    /// Display label of the field.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Kind of control rendered.
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    /// Options of a SELECT input; empty for TEXT.
    pub fn options(&self) -> &[InputOption] {
        &self.options
    }
}

/// Builder for [`CustomerInput`]; setters fail fast on invalid values.
#[derive(Debug, Default)]
pub struct CustomerInputBuilder {
    label: Option<String>,
    placeholder: String,
    input_type: Option<InputType>,
    required: bool,
    options: Vec<InputOption>,
}

impl CustomerInputBuilder {
    /// Set the display label; must be non-empty after trimming.
    pub fn label(mut self, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        rules::require_non_empty("label", &label)?;
        self.label = Some(label.trim().to_string());
        Ok(self)
    }

    /// Set the placeholder text.
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Set the kind of control.
    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = Some(input_type);
        self
    }

    /// Mark the field as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Add a SELECT option; the key must be non-empty.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        rules::require_non_empty("option key", &key)?;
        self.options.push(InputOption {
            key,
            value: value.into(),
        });
        Ok(self)
    }

    /// Finalize the input, checking cross-field invariants.
    pub fn build(self) -> Result<CustomerInput> {
        let label = self
            .label
            .ok_or_else(|| PayFluidError::validation("label", "must be set"))?;
        let input_type = self
            .input_type
            .ok_or_else(|| PayFluidError::validation("type", "must be set"))?;
        if input_type == InputType::Select && self.options.is_empty() {
            return Err(PayFluidError::validation(
                "options",
                "a SELECT input needs at least one option",
            ));
        }
        Ok(CustomerInput {
            label,
            placeholder: self.placeholder,
            input_type,
            required: self.required,
            options: self.options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_builds_without_options() {
        let input = CustomerInput::builder()
            .label("Student ID")
            .unwrap()
            .input_type(InputType::Text)
            .required(true)
            .build()
            .unwrap();

        assert_eq!(input.label(), "Student ID");
        assert_eq!(input.input_type(), InputType::Text);
        assert!(input.options().is_empty());
    }

    #[test]
    fn test_select_requires_an_option() {
        let err = CustomerInput::builder()
            .label("Campus")
            .unwrap()
            .input_type(InputType::Select)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at least one option"));

        let input = CustomerInput::builder()
            .label("Campus")
            .unwrap()
            .input_type(InputType::Select)
            .option("main", "Main Campus")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(input.options().len(), 1);
    }

    #[test]
    fn test_label_and_type_must_be_set() {
        let err = CustomerInput::builder()
            .input_type(InputType::Text)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("label"));

        let err = CustomerInput::builder()
            .label("Campus")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn test_empty_label_and_option_key_fail() {
        assert!(CustomerInput::builder().label("   ").is_err());
        assert!(CustomerInput::builder()
            .label("Campus")
            .unwrap()
            .option("", "Main")
            .is_err());
    }

    #[test]
    fn test_label_is_trimmed() {
        let input = CustomerInput::builder()
            .label("  Campus  ")
            .unwrap()
            .input_type(InputType::Text)
            .build()
            .unwrap();
        assert_eq!(input.label(), "Campus");
    }

    #[test]
    fn test_wire_shape() {
        let input = CustomerInput::builder()
            .label("Campus")
            .unwrap()
            .input_type(InputType::Select)
            .option("main", "Main Campus")
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["type"], "SELECT");
        assert_eq!(json["options"][0]["key"], "main");
        assert!(json.get("placeholder").is_none());
    }
}
