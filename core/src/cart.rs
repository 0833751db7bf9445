//! Cart - the in-memory cart state container.
//!
//! The Cart holds line items keyed by catalog id, preserving insertion
//! order for display. All operations are total: malformed input is clamped
//! or ignored, never an error.

use crate::{CartLineItem, Quantity};
use serde::{Deserialize, Serialize};

/// The client-held collection of line items a user intends to purchase.
///
/// Ids are unique; two calls to [`Cart::add_item`] with the same id merge
/// into one entry. Quantities are always at least 1; entries are removed,
/// never zero-quantitied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` of `item` to the cart.
    ///
    /// If the id is already present, the existing entry's quantity is
    /// incremented; the incoming item's display fields are ignored.
    /// Non-positive quantities are clamped to 1.
    pub fn add_item(&mut self, item: CartLineItem, quantity: Quantity) {
        let quantity = quantity.max(1);
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => existing.quantity += quantity,
            None => {
                let mut item = item;
                item.quantity = quantity;
                self.items.push(item);
            }
        }
    }

    /// Set an entry's quantity directly (not incremental).
    ///
    /// Clamped to at least 1. A no-op if the id is absent or the entry is
    /// out of stock; callers already clamp and gate, but the cart does not
    /// trust callers.
    pub fn update_quantity(&mut self, id: &str, quantity: Quantity) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            if item.in_stock {
                item.quantity = quantity.max(1);
            }
        }
    }

    /// Delete the entry if present; a no-op otherwise.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Wholesale replace the cart's contents (the hydration path).
    ///
    /// Duplicate ids in the input collapse to the last occurrence, keeping
    /// the id-uniqueness invariant; quantities are clamped to at least 1.
    pub fn set_items(&mut self, items: Vec<CartLineItem>) {
        self.items.clear();
        for mut item in items {
            item.quantity = item.quantity.max(1);
            self.items.retain(|existing| existing.id != item.id);
            self.items.push(item);
        }
    }

    /// Get an entry by id.
    pub fn get(&self, id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Check whether an id is in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All entries in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether the cart has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities across entries (the badge count).
    pub fn count(&self) -> Quantity {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// An entry's quantity, or 0 if the id is absent.
    pub fn item_quantity(&self, id: &str) -> Quantity {
        self.get(id).map(|i| i.quantity).unwrap_or(0)
    }

    /// Sum of `price * quantity` over entries whose id is in
    /// `selected_ids`. Ids not in the cart contribute zero.
    pub fn selected_total<S: AsRef<str>>(&self, selected_ids: &[S]) -> f64 {
        self.items
            .iter()
            .filter(|i| selected_ids.iter().any(|s| s.as_ref() == i.id))
            .map(CartLineItem::line_total)
            .sum()
    }

    /// Ids of all in-stock entries, in display order. The UI's default
    /// selection whenever the cart changes shape.
    pub fn in_stock_ids(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| i.in_stock)
            .map(|i| i.id.clone())
            .collect()
    }
}
