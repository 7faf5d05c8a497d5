//! Validation errors for user-submitted catalog data.

/// Errors raised when submitted data fails validation.
///
/// These are reported to the user and abort the operation before anything
/// is written.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A product must carry at least one image.
    #[error("Please add at least one image")]
    MissingImage,
    /// Too many images for a single product.
    #[error("Maximum {max} images allowed")]
    TooManyImages {
        /// Maximum allowed image count.
        max: usize,
    },
    /// An uploaded image is over the size limit.
    #[error("{name} is too large (max {max_mb}MB)")]
    ImageTooLarge {
        /// File name of the rejected image.
        name: String,
        /// Limit in megabytes.
        max_mb: u64,
    },
    /// A numeric field could not be parsed.
    #[error("{field} must be a number")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Price must not be negative.
    #[error("price cannot be negative")]
    NegativePrice,
    /// Star ratings run from 1 to 5.
    #[error("rating must be between 1 and 5 (got {0})")]
    StarsOutOfRange(u8),
    /// Aggregate ratings run from 0.0 to 5.0.
    #[error("rating must be between 0 and 5 (got {0})")]
    RatingOutOfRange(String),
    /// The product references a category that does not exist.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
