//! Input checks shared by the services.
//!
//! Text is trimmed before it is stored. Blank optional text is stored as `None`.

use crate::errors::{Error, Result};

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 8;

/// Trims `value`, failing if nothing is left.
pub fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trims `value`, mapping blank text to `None`.
#[must_use]
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Accepts finite, non-negative amounts (prices, costs, fees).
pub fn amount(value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidAmount { amount: value });
    }
    Ok(value)
}

/// Accepts finite, strictly positive quantities.
pub fn quantity(value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::validation(format!(
            "quantity must be a positive number, got {value}"
        )));
    }
    Ok(value)
}

/// Trims and lowercases an email address and checks its basic shape.
pub fn email(value: &str) -> Result<String> {
    let trimmed = required_text("email", value)?.to_lowercase();
    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
        && !trimmed.contains(char::is_whitespace);
    if !valid {
        return Err(Error::validation(format!("'{trimmed}' is not a valid email address")));
    }
    Ok(trimmed)
}

/// Checks the minimum password length.
pub fn password(value: &str) -> Result<&str> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(value)
}
