//! Field validation rules shared by the request value objects.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::{PayFluidError, Result};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,}$").expect("valid phone pattern"));

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{1,10}$").expect("valid reference pattern"));

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid color pattern")
});

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PayFluidError::validation(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_email(field: &str, value: &str) -> Result<()> {
    if !EMAIL.is_match(value) {
        return Err(PayFluidError::validation(field, "must be a valid email address"));
    }
    Ok(())
}

pub(crate) fn require_phone(field: &str, value: &str) -> Result<()> {
    if !PHONE.is_match(value) {
        return Err(PayFluidError::validation(
            field,
            "must contain only digits and be at least 10 digits long",
        ));
    }
    Ok(())
}

pub(crate) fn require_reference(value: &str) -> Result<()> {
    if !REFERENCE.is_match(value) {
        return Err(PayFluidError::validation(
            "reference",
            "must be alphanumeric and at most 10 characters",
        ));
    }
    Ok(())
}

pub(crate) fn require_hex_color(field: &str, value: &str) -> Result<()> {
    if !HEX_COLOR.is_match(value) {
        return Err(PayFluidError::validation(
            field,
            "must be a 3- or 6-digit hex color prefixed with '#'",
        ));
    }
    Ok(())
}

pub(crate) fn require_url(field: &str, value: &str) -> Result<()> {
    let parsed = Url::parse(value)
        .map_err(|e| PayFluidError::validation(field, format!("must be a valid URL: {e}")))?;
    if !parsed.has_host() {
        return Err(PayFluidError::validation(field, "must be a valid URL with a host"));
    }
    Ok(())
}

/// Amounts must be strictly positive finite decimals; zero is rejected.
pub(crate) fn require_positive_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PayFluidError::validation(
            field,
            "must be a strictly positive finite amount",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_rule() {
        assert!(require_email("email", "a@b.com").is_ok());
        assert!(require_email("email", "first.last@sub.domain.org").is_ok());
        assert!(require_email("email", "not-an-email").is_err());
        assert!(require_email("email", "a@b").is_err());
        assert!(require_email("email", "a b@c.com").is_err());
    }

    #[test]
    fn test_phone_rule_boundaries() {
        assert!(require_phone("phone", "0241111111").is_ok()); // exactly 10
        assert!(require_phone("phone", "024111111").is_err()); // 9 digits
        assert!(require_phone("phone", "02411x1111").is_err()); // non-digit
        assert!(require_phone("phone", "+233241111111").is_err()); // sign is not a digit
        assert!(require_phone("phone", "233241111111").is_ok()); // longer than 10
    }

    #[test]
    fn test_reference_rule_boundaries() {
        assert!(require_reference("abc123").is_ok());
        assert!(require_reference("a234567890").is_ok()); // exactly 10
        assert!(require_reference("a2345678901").is_err()); // 11
        assert!(require_reference("").is_err());
        assert!(require_reference("abc-123").is_err());
    }

    #[test]
    fn test_hex_color_rule() {
        assert!(require_hex_color("border_theme", "#aa33ff").is_ok());
        assert!(require_hex_color("border_theme", "#a3f").is_ok());
        assert!(require_hex_color("border_theme", "invalid#hex").is_err());
        assert!(require_hex_color("border_theme", "#aa33fg").is_err());
        assert!(require_hex_color("border_theme", "#aa33f").is_err());
        assert!(require_hex_color("border_theme", "aa33ff").is_err());
    }

    #[test]
    fn test_url_rule() {
        assert!(require_url("redirect_url", "https://x/y").is_ok());
        assert!(require_url("redirect_url", "http://localhost:8080/done").is_ok());
        assert!(require_url("redirect_url", "not a url").is_err());
        assert!(require_url("redirect_url", "mailto:a@b.com").is_err());
    }

    #[test]
    fn test_amount_rule() {
        assert!(require_positive_amount("amount", 0.01).is_ok());
        assert!(require_positive_amount("amount", 0.0).is_err());
        assert!(require_positive_amount("amount", -1.0).is_err());
        assert!(require_positive_amount("amount", f64::NAN).is_err());
        assert!(require_positive_amount("amount", f64::INFINITY).is_err());
    }
}
