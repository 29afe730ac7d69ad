//! Field-level request validation.
//!
//! Enum membership is enforced by serde during deserialization; these
//! helpers cover the remaining basic constraints (non-empty strings, URL
//! format, positive amounts). The first failure's message becomes the 400
//! response body.

use rust_decimal::Decimal;

use kasilink_core::Price;

use crate::error::AppError;

/// Require a non-empty string field.
pub fn non_empty(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Require a well-formed URL.
pub fn valid_url(field: &'static str, value: &str) -> Result<(), AppError> {
    url::Url::parse(value)
        .map_err(|_| AppError::Validation(format!("{field} must be a valid URL")))?;
    Ok(())
}

/// Require a strictly positive money amount.
pub fn positive_amount(field: &'static str, amount: Decimal) -> Result<Price, AppError> {
    Price::new(amount).map_err(|e| AppError::Validation(format!("{field}: {e}")))
}
