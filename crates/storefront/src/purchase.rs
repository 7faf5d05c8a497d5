//! WhatsApp purchase hand-off.
//!
//! There is no cart or checkout. Buying means opening a click-to-chat link
//! with a prefilled message naming the product.

use ecobloom_core::Product;
use url::Url;

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Which prefilled message to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseMessage {
    /// From a product card.
    Enquiry,
    /// From the product detail view.
    Order,
    /// From the wishlist panel.
    Wishlist,
}

impl PurchaseMessage {
    /// The message text for `product`.
    #[must_use]
    pub fn text(self, product: &Product) -> String {
        let price = product.price.display();
        match self {
            Self::Enquiry => format!(
                "Hi, I'm interested in \"{}\" ({price}). Can you provide more details?",
                product.name
            ),
            Self::Order => format!(
                "Hi ECO BLOOM, I'm interested in purchasing \"{}\" (Price: {price}). Please provide ordering details.",
                product.name
            ),
            Self::Wishlist => format!("Hi, I want to buy \"{}\"", product.name),
        }
    }
}

/// Builds purchase links for one shop number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseLinks {
    number: String,
}

impl PurchaseLinks {
    /// Links to `number`, digits only in international form.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }

    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// The click-to-chat URL for `product`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured number does not form a valid URL.
    pub fn link(&self, product: &Product, message: PurchaseMessage) -> Result<Url, url::ParseError> {
        let text = message.text(product);
        // Percent-encode spaces as %20; form encoding would give '+'
        Url::parse(&format!(
            "{WHATSAPP_BASE}{}?text={}",
            self.number,
            urlencoding::encode(&text)
        ))
    }
}
