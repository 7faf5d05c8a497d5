//! The product add/edit form.

use std::path::PathBuf;

use ecobloom_core::{CategoryId, Price, Product, ProductDraft, ProductId, ValidationError};

use crate::services::images::{ImageError, ImageList, IntakeReport};

/// Product form state, as typed by the admin.
#[derive(Debug)]
pub struct ProductForm {
    /// Set when editing an existing product.
    pub id: Option<ProductId>,
    pub name: String,
    /// Price as entered.
    pub price: String,
    pub category: String,
    pub description: String,
    pub featured: bool,
    images: ImageList,
}

impl ProductForm {
    /// An empty form for a new product.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            price: String::new(),
            category: String::new(),
            description: String::new(),
            featured: false,
            images: ImageList::default(),
        }
    }

    /// A form prefilled from `product`, including its images.
    #[must_use]
    pub fn edit(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            price: product.price.amount().to_string(),
            category: product.category.to_string(),
            description: product.description.clone(),
            featured: product.featured,
            images: ImageList::new(product.images.clone()),
        }
    }

    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Handle to the form's image list, for removals while a batch loads.
    #[must_use]
    pub fn image_list(&self) -> ImageList {
        self.images.clone()
    }

    #[must_use]
    pub fn images(&self) -> Vec<String> {
        self.images.snapshot()
    }

    /// Read image files and append them as data URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch would exceed the image limit.
    pub async fn add_images<I>(&self, paths: I) -> Result<IntakeReport, ImageError>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.images.add_files(paths).await
    }

    /// Drop the image at `index`.
    pub fn remove_image(&self, index: usize) -> Option<String> {
        self.images.remove(index)
    }

    /// Turn the form into a validated draft.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for a blank name or category, an
    /// unparsable or negative price, or a bad image count.
    pub fn to_draft(&self) -> Result<ProductDraft, ValidationError> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyField { field: "category" });
        }
        let price: Price = self.price.parse()?;

        let draft = ProductDraft {
            id: self.id.clone(),
            name: self.name.trim().to_string(),
            price,
            category: CategoryId::new(category),
            description: self.description.trim().to_string(),
            images: self.images.snapshot(),
            featured: self.featured,
        };
        draft.validate()?;
        Ok(draft)
    }
}
