//! Review stars and aggregate product ratings.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use super::ValidationError;

/// A single review's star rating, 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    /// Lowest allowed star rating.
    pub const MIN: u8 = 1;
    /// Highest allowed star rating.
    pub const MAX: u8 = 5;

    /// Create a star rating.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::StarsOutOfRange` outside `1..=5`.
    pub const fn new(value: u8) -> Result<Self, ValidationError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(ValidationError::StarsOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// The star count.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

/// Aggregate product rating, 0.0 through 5.0 with one decimal place.
///
/// This is a denormalized cache of the mean over a product's reviews and is
/// recomputed with [`Rating::mean_of`] whenever a review is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Rating(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rating {
    /// No rating (also used when a stored product has none).
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a rating, rounding to one decimal place.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::RatingOutOfRange` outside `0.0..=5.0`.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value < Decimal::ZERO || value > Decimal::from(Stars::MAX) {
            return Err(ValidationError::RatingOutOfRange(value.to_string()));
        }
        Ok(Self(round_one_decimal(value)))
    }

    /// Mean of a set of star ratings, rounded half away from zero to one
    /// decimal place. An empty set yields [`Rating::ZERO`].
    #[must_use]
    pub fn mean_of<I>(stars: I) -> Self
    where
        I: IntoIterator<Item = Stars>,
    {
        let (sum, count) = stars
            .into_iter()
            .fold((0u32, 0u32), |(sum, count), s| {
                (sum + u32::from(s.get()), count + 1)
            });
        if count == 0 {
            return Self::ZERO;
        }
        Self(round_one_decimal(
            Decimal::from(sum) / Decimal::from(count),
        ))
    }

    /// The rating value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

fn round_one_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
