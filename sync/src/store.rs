//! CartStore - the shared, observable cart handle.
//!
//! Screens clone the handle freely and call mutators directly for instant
//! feedback; each mutation publishes a [`CartEvent`] after the cart is
//! updated, so an observer reading through the handle during notification
//! sees post-mutation state. The cart itself is owned exclusively here and
//! is never mutated by subscribers.

use std::sync::{Arc, Mutex, MutexGuard};

use cart_core::{Cart, CartLineItem, CheckoutTotals, PricingRules, Quantity};
use tokio::sync::watch;

/// Where a mutation came from.
///
/// Hydration (the engine's own `set_items`) must not schedule a push;
/// everything user-originated does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOrigin {
    /// Direct user action: add, update quantity, remove, clear
    User,
    /// The sync engine's replace-on-login path
    Hydration,
}

/// One observed cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartEvent {
    /// Monotonic per-store mutation counter
    pub revision: u64,
    pub origin: MutationOrigin,
}

/// Cheaply-cloneable handle to the cart.
///
/// Constructed once at the application's composition root and passed to
/// screens and to the sync engine explicitly; there is no ambient global.
#[derive(Debug, Clone)]
pub struct CartStore {
    inner: Arc<Mutex<Cart>>,
    events: Arc<watch::Sender<CartEvent>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create a store holding an empty guest cart.
    pub fn new() -> Self {
        let (events, _) = watch::channel(CartEvent {
            revision: 0,
            origin: MutationOrigin::Hydration,
        });
        Self {
            inner: Arc::new(Mutex::new(Cart::new())),
            events: Arc::new(events),
        }
    }

    fn cart(&self) -> MutexGuard<'_, Cart> {
        // A poisoned lock only means a panic elsewhere mid-mutation; the
        // cart data itself is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, origin: MutationOrigin) {
        self.events.send_modify(|event| {
            event.revision += 1;
            event.origin = origin;
        });
    }

    /// Subscribe to mutation events.
    pub fn subscribe(&self) -> watch::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Add `quantity` of `item`, merging with an existing entry by id.
    pub fn add_item(&self, item: CartLineItem, quantity: Quantity) {
        self.cart().add_item(item, quantity);
        self.publish(MutationOrigin::User);
    }

    /// Set an entry's quantity directly; clamped to at least 1, a no-op
    /// for unknown ids and out-of-stock entries.
    pub fn update_quantity(&self, id: &str, quantity: Quantity) {
        self.cart().update_quantity(id, quantity);
        self.publish(MutationOrigin::User);
    }

    /// Delete an entry if present.
    pub fn remove_item(&self, id: &str) {
        self.cart().remove_item(id);
        self.publish(MutationOrigin::User);
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.cart().clear();
        self.publish(MutationOrigin::User);
    }

    /// Wholesale replace the cart's contents. Hydration only; does not
    /// count as a user mutation and schedules no push.
    pub fn set_items(&self, items: Vec<CartLineItem>) {
        self.cart().set_items(items);
        self.publish(MutationOrigin::Hydration);
    }

    /// Snapshot of all entries in display order.
    pub fn items(&self) -> Vec<CartLineItem> {
        self.cart().items().to_vec()
    }

    /// Sum of all quantities (the badge count).
    pub fn count(&self) -> Quantity {
        self.cart().count()
    }

    /// An entry's quantity, or 0 if absent.
    pub fn item_quantity(&self, id: &str) -> Quantity {
        self.cart().item_quantity(id)
    }

    /// Sum of `price * quantity` over the selected entries.
    pub fn selected_total<S: AsRef<str>>(&self, selected_ids: &[S]) -> f64 {
        self.cart().selected_total(selected_ids)
    }

    /// Checkout totals for the selected entries under `rules`.
    pub fn totals<S: AsRef<str>>(&self, rules: &PricingRules, selected_ids: &[S]) -> CheckoutTotals {
        rules.totals_for(&self.cart(), selected_ids)
    }

    /// Ids of in-stock entries, the UI's default selection.
    pub fn in_stock_ids(&self) -> Vec<String> {
        self.cart().in_stock_ids()
    }
}
