//! Customer reviews and the review submission form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProductId, Stars, ValidationError};

/// A stored customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Product the review belongs to.
    pub product_id: ProductId,
    /// Reviewer's name.
    pub name: String,
    /// Star rating.
    pub rating: Stars,
    /// Free-text comment.
    pub comment: String,
    /// When the review was submitted.
    pub date: DateTime<Utc>,
}

/// Review data as submitted by a customer, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewForm {
    pub name: String,
    pub rating: u8,
    pub comment: String,
}

impl ReviewForm {
    /// Validate the submitted form.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` if the name or comment is blank,
    /// or `ValidationError::StarsOutOfRange` if the rating is not 1-5.
    pub fn validate(self) -> Result<ValidReview, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        let rating = Stars::new(self.rating)?;
        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(ValidationError::EmptyField { field: "review" });
        }
        Ok(ValidReview {
            name: name.to_owned(),
            rating,
            comment: comment.to_owned(),
        })
    }
}

/// A review form that passed validation.
///
/// Only obtainable through [`ReviewForm::validate`], so the repository never
/// sees unchecked input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReview {
    name: String,
    rating: Stars,
    comment: String,
}

impl ValidReview {
    /// Star rating of the review.
    #[must_use]
    pub const fn rating(&self) -> Stars {
        self.rating
    }

    /// Attach the review to a product at a point in time.
    #[must_use]
    pub fn into_review(self, product_id: ProductId, date: DateTime<Utc>) -> Review {
        Review {
            product_id,
            name: self.name,
            rating: self.rating,
            comment: self.comment,
            date,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, rating: u8, comment: &str) -> ReviewForm {
        ReviewForm {
            name: name.to_owned(),
            rating,
            comment: comment.to_owned(),
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let review = form("  Nimal ", 5, " Lovely aroma ")
            .validate()
            .unwrap()
            .into_review(ProductId::new("1"), Utc::now());
        assert_eq!(review.name, "Nimal");
        assert_eq!(review.comment, "Lovely aroma");
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        assert_eq!(
            form("   ", 4, "ok").validate(),
            Err(ValidationError::EmptyField { field: "name" })
        );
    }

    #[test]
    fn test_validate_rejects_rating_out_of_range() {
        assert_eq!(
            form("Ann", 0, "meh").validate(),
            Err(ValidationError::StarsOutOfRange(0))
        );
        assert!(form("Ann", 6, "wow").validate().is_err());
    }

    #[test]
    fn test_review_json_shape() {
        let json = r#"{"productId":"2","name":"Kumari","rating":4,"comment":"Great","date":"2024-05-01T10:00:00Z"}"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.product_id, ProductId::new("2"));
        assert_eq!(review.rating.get(), 4);
    }
}
