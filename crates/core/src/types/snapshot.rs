//! Backup documents for exporting and restoring the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Category, Product, ProductDraft, Review, ValidationError};

/// A full export of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub reviews: Vec<Review>,
    pub export_date: DateTime<Utc>,
}

impl Snapshot {
    /// Suggested download name, e.g. `ecobloom-backup-2024-05-01.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("ecobloom-backup-{}.json", self.export_date.format("%Y-%m-%d"))
    }

    /// Pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A backup document being restored.
///
/// Each collection is optional and applied independently; a missing (or
/// `null`) field leaves that collection untouched. `exportDate` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotImport {
    #[serde(default, deserialize_with = "deserialize_products")]
    pub products: Option<Vec<Product>>,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[serde(default)]
    pub reviews: Option<Vec<Review>>,
}

impl SnapshotImport {
    /// Parse a backup document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or a present
    /// collection has the wrong shape.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Imported products must carry between one and
/// [`ProductDraft::MAX_IMAGES`] image references.
fn deserialize_products<'de, D>(deserializer: D) -> Result<Option<Vec<Product>>, D::Error>
where
    D: Deserializer<'de>,
{
    let products = Option::<Vec<Product>>::deserialize(deserializer)?;
    for product in products.iter().flatten() {
        let problem = if product.images.is_empty() {
            Some(ValidationError::MissingImage)
        } else if product.images.len() > ProductDraft::MAX_IMAGES {
            Some(ValidationError::TooManyImages {
                max: ProductDraft::MAX_IMAGES,
            })
        } else {
            None
        };
        if let Some(e) = problem {
            return Err(serde::de::Error::custom(format_args!(
                "product {}: {e}",
                product.id
            )));
        }
    }
    Ok(products)
}
