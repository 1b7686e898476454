//! Add-to-cart request payloads.
//!
//! A [`CartItemDraft`] is transient: the presentation layer constructs one
//! per click and the core discards it after the mutation completes. The
//! presentation layer hands over validated input; a [`CartItemDraft::validate`]
//! violation indicates a caller bug, not a runtime condition.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use marigold_core::ProductId;

/// Validation errors for a [`CartItemDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    /// The product ID is the empty string.
    #[error("product id must not be empty")]
    EmptyProductId,

    /// The display title is empty.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The unit price is below zero.
    #[error("unit price must not be negative")]
    NegativePrice,

    /// The quantity is zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// The payload for a single add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemDraft {
    /// Opaque stable product identifier.
    pub product_id: ProductId,
    /// Display name shown in the cart and the success confirmation.
    pub title: String,
    /// Unit price in the store currency.
    pub unit_price: Decimal,
    /// Optional product image reference.
    pub image_ref: Option<String>,
    /// Number of units to add. The product card always requests 1 per click.
    pub quantity: u32,
}

impl CartItemDraft {
    /// Create a draft for a single unit with no image.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, title: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            unit_price,
            image_ref: None,
            quantity: 1,
        }
    }

    /// Set the product image reference.
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Set the quantity to add.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Check the draft preconditions.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition: empty product ID, empty
    /// title, negative price, or zero quantity.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.product_id.is_empty() {
            return Err(DraftError::EmptyProductId);
        }
        if self.title.trim().is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.unit_price < Decimal::ZERO {
            return Err(DraftError::NegativePrice);
        }
        if self.quantity == 0 {
            return Err(DraftError::ZeroQuantity);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn widget() -> CartItemDraft {
        CartItemDraft::new("p1", "Widget", dec!(9.99))
    }

    #[test]
    fn test_new_defaults_to_single_unit() {
        let draft = widget();
        assert_eq!(draft.quantity, 1);
        assert_eq!(draft.image_ref, None);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let draft = widget().with_image("https://cdn.example/p1.png").with_quantity(3);
        assert_eq!(draft.image_ref.as_deref(), Some("https://cdn.example/p1.png"));
        assert_eq!(draft.quantity, 3);
    }

    #[test]
    fn test_validate_empty_product_id() {
        let draft = CartItemDraft::new("", "Widget", dec!(9.99));
        assert_eq!(draft.validate(), Err(DraftError::EmptyProductId));
    }

    #[test]
    fn test_validate_blank_title() {
        let draft = CartItemDraft::new("p1", "   ", dec!(9.99));
        assert_eq!(draft.validate(), Err(DraftError::EmptyTitle));
    }

    #[test]
    fn test_validate_negative_price() {
        let draft = CartItemDraft::new("p1", "Widget", dec!(-0.01));
        assert_eq!(draft.validate(), Err(DraftError::NegativePrice));
    }

    #[test]
    fn test_validate_zero_quantity() {
        let draft = widget().with_quantity(0);
        assert_eq!(draft.validate(), Err(DraftError::ZeroQuantity));
    }

    #[test]
    fn test_validate_free_item_is_allowed() {
        // Promotional zero-price items are valid; only negative prices are not.
        let draft = CartItemDraft::new("p1", "Sticker", Decimal::ZERO);
        assert!(draft.validate().is_ok());
    }
}
