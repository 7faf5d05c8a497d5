//! Product categories.

use serde::{Deserialize, Serialize};

use super::CategoryId;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier referenced by products.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

impl Category {
    /// Create a category.
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The five categories used when none have been persisted.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("spices", "Ceylon Spices"),
            Self::new("coconut", "Coconut Products"),
            Self::new("tea", "Tea & Herbs"),
            Self::new("oil", "Essential Oils"),
            Self::new("handicraft", "Handicrafts"),
        ]
    }
}
