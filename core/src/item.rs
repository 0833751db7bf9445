//! Line item types for the cart.

use crate::{ItemId, Quantity};
use serde::{Deserialize, Serialize};

/// One product instance a user intends to purchase.
///
/// The `id` is the catalog identifier. It may be a remote-authority primary
/// key (a canonical UUID) or a purely local identifier fabricated for mock
/// catalog entries; the cart treats both identically and the sync layer
/// filters the latter out at push time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Catalog identifier; sole basis of item identity
    pub id: ItemId,
    /// Display name, immutable after creation
    pub name: String,
    /// Display image, immutable after creation
    pub image: String,
    /// Current unit price
    pub price: f64,
    /// Pre-discount unit price; `price <= original_price` is expected but
    /// not enforced
    pub original_price: f64,
    /// Optional variant descriptor; not part of identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional variant descriptor; not part of identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Always at least 1; entries are removed rather than zero-quantitied
    pub quantity: Quantity,
    /// Out-of-stock entries are excluded from the default selection and
    /// from quantity mutation
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<String>,
}

impl CartLineItem {
    /// Create a line item with quantity 1, in stock, and no variant or
    /// descriptive metadata.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        image: impl Into<String>,
        price: f64,
        original_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
            price,
            original_price,
            color: None,
            size: None,
            quantity: 1,
            in_stock: true,
            category: None,
            rating: None,
            estimated_delivery: None,
        }
    }

    /// Set the variant descriptors.
    pub fn with_variant(mut self, color: impl Into<String>, size: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self.size = Some(size.into());
        self
    }

    /// Mark the item out of stock.
    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }

    /// Price times quantity for this entry.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Discount percentage implied by `original_price`, or `None` when no
    /// discount applies. Computed defensively: a zero or inverted original
    /// price yields `None` rather than a negative badge.
    pub fn discount_percent(&self) -> Option<u32> {
        if self.original_price > self.price && self.original_price > 0.0 {
            let pct = (self.original_price - self.price) / self.original_price * 100.0;
            Some(pct.round() as u32)
        } else {
            None
        }
    }
}
