//! Input validation for API requests.
//!
//! Validators return `Result<(), String>` and are collected per-request with
//! the `ValidationErrorBuilder` from the `error` module.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating email addresses (pragmatic, not RFC-complete)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9][-a-zA-Z0-9]*(\.[a-zA-Z0-9][-a-zA-Z0-9]*)+$"
    ).unwrap();

    /// Regex for validating UUID v4 path parameters
    static ref UUID_REGEX: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    ).unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate a password meets the minimum length
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    Ok(())
}

/// Validate a required text field is present and non-blank after trimming
pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    if value.len() > 500 {
        return Err(format!("{} is too long (max 500 characters)", label));
    }
    Ok(())
}

/// Validate a monetary amount is strictly positive and finite
pub fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() {
        return Err("Amount must be a number".to_string());
    }
    if amount <= 0.0 {
        return Err("Amount must be a positive number".to_string());
    }
    Ok(())
}

/// Validate an optional monetary amount (e.g. monthly_rent) when present
pub fn validate_optional_amount(amount: Option<f64>) -> Result<(), String> {
    match amount {
        Some(a) => validate_amount(a),
        None => Ok(()),
    }
}

/// Validate a non-negative cost figure
pub fn validate_cost(cost: f64) -> Result<(), String> {
    if !cost.is_finite() || cost < 0.0 {
        return Err("Cost must be zero or a positive number".to_string());
    }
    Ok(())
}

/// Validate a date in ISO format (YYYY-MM-DD)
pub fn validate_date(date: &str, label: &str) -> Result<(), String> {
    let date = date.trim();
    if date.is_empty() {
        return Err(format!("{} is required", label));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("{} must be a date in YYYY-MM-DD format", label))
}

/// Validate an optional date field when present
pub fn validate_optional_date(date: &Option<String>, label: &str) -> Result<(), String> {
    match date.as_deref() {
        Some(d) if !d.trim().is_empty() => validate_date(d, label),
        _ => Ok(()),
    }
}

/// Validate a UUID path parameter
pub fn validate_uuid(id: &str, label: &str) -> Result<(), String> {
    if !UUID_REGEX.is_match(id) {
        return Err(format!("{} must be a valid UUID", label));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("landlord@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.domain.io").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("12 Elm St", "Address").is_ok());
        assert!(validate_required("   ", "Address").is_err());
        assert!(validate_required("", "Name").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(1200.50).is_ok());
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-5.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_optional_amount(None).is_ok());
        assert!(validate_optional_amount(Some(-1.0)).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-08-06", "Payment date").is_ok());
        assert!(validate_date("08/06/2026", "Payment date").is_err());
        assert!(validate_date("2026-13-01", "Payment date").is_err());
        assert!(validate_date("", "Payment date").is_err());
        assert!(validate_optional_date(&None, "Installation date").is_ok());
        assert!(validate_optional_date(&Some("2023-01-15".to_string()), "Installation date").is_ok());
        assert!(validate_optional_date(&Some("nope".to_string()), "Installation date").is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid(&uuid::Uuid::new_v4().to_string(), "property_id").is_ok());
        assert!(validate_uuid("1234", "property_id").is_err());
        assert!(validate_uuid("'; DROP TABLE properties;--", "property_id").is_err());
    }
}
