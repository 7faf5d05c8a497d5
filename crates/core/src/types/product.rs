//! Products and the product submission draft.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{CategoryId, Price, ProductId, Rating, ValidationError};

/// A catalog product as persisted in the durable store.
///
/// The JSON shape matches existing exports: camelCase keys, `price` and
/// `rating` as numbers, and `reviews` holding the review count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Category identifier. May dangle if the category was later removed.
    pub category: CategoryId,
    #[serde(default)]
    pub description: String,
    /// Image references (URLs or data URLs); the first is the main image.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    /// Mean review rating, cached on the product.
    #[serde(default)]
    pub rating: Rating,
    /// Number of reviews, cached on the product.
    #[serde(
        default,
        rename = "reviews",
        deserialize_with = "deserialize_review_count"
    )]
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The main (first) image, if any.
    #[must_use]
    pub fn main_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Older admin builds wrote `reviews: []` instead of a count.
fn deserialize_review_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Count(u32),
        Legacy(Vec<serde_json::Value>),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Count(count) => count,
        Repr::Legacy(items) => u32::try_from(items.len()).unwrap_or(u32::MAX),
    })
}

/// Product data submitted from the admin form.
///
/// `id` is `None` for a new product and `Some` when editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: Price,
    pub category: CategoryId,
    pub description: String,
    pub images: Vec<String>,
    pub featured: bool,
}

impl ProductDraft {
    /// Maximum number of images per product.
    pub const MAX_IMAGES: usize = 5;

    /// Check the fields that do not depend on other catalog state.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` for a blank name,
    /// `ValidationError::MissingImage` when no image is attached and
    /// `ValidationError::TooManyImages` above [`Self::MAX_IMAGES`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if self.images.is_empty() {
            return Err(ValidationError::MissingImage);
        }
        if self.images.len() > Self::MAX_IMAGES {
            return Err(ValidationError::TooManyImages {
                max: Self::MAX_IMAGES,
            });
        }
        Ok(())
    }
}
