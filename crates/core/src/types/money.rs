//! Positive money amounts backed by decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("amount must be greater than zero")]
    NotPositive,
}

/// A strictly positive money amount.
///
/// Used for product prices and task budgets. Amounts are decimal (never
/// floating point) and validated to be greater than zero at construction.
/// Serialization is delegated to [`Decimal`], which accepts both numeric
/// and string JSON representations on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, rejecting zero and negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if `amount <= 0`.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    #[test]
    fn test_positive_amount_accepted() {
        let price = Price::new(dec("450.00")).expect("valid price");
        assert_eq!(price.amount(), dec("450.00"));
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        assert_eq!(Price::new(dec("0")), Err(PriceError::NotPositive));
        assert_eq!(Price::new(dec("-1.50")), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_deserializes_from_number_and_string() {
        let from_number: Decimal = serde_json::from_str("150").expect("number");
        let from_string: Decimal = serde_json::from_str("\"150.00\"").expect("string");
        assert_eq!(
            Price::new(from_number).expect("price"),
            Price::new(from_string).expect("price")
        );
    }
}
