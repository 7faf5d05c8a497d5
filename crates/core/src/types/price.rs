//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are persisted as plain JSON numbers (`18.99`) for compatibility
//! with existing exports, but held as [`Decimal`] in memory so comparisons
//! and display never suffer float drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::ValidationError;

/// A non-negative product price in the store currency.
///
/// Deserialization goes through [`Price::new`], so a stored or imported
/// negative amount is a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NegativePrice` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::NegativePrice);
        }
        Ok(Self(amount))
    }

    /// Create a price from an integer number of cents.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NegativePrice` if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The amount in the store currency's standard unit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display (e.g. `"$18.99"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", CurrencyCode::default().symbol(), self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for Price {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| ValidationError::InvalidNumber { field: "price" })?;
        Self::new(amount)
    }
}

/// ISO 4217 currency codes.
///
/// Only USD is used; there is no conversion between currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}
