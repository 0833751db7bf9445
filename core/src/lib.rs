//! # Cart Core
//!
//! The pure state container behind the storefront's shopping cart.
//!
//! This crate holds the cart's line items and computes every derived value
//! the client renders (counts, per-selection subtotals, coupon tiers,
//! shipping, tax). It has no knowledge of the network, the session, or the
//! UI; synchronization lives in the `cart-sync` crate.
//!
//! ## Design Principles
//!
//! - **No IO**: the cart is plain data plus pure functions over it
//! - **Total operations**: no mutator or query ever fails; malformed input
//!   is clamped or ignored, never surfaced as an error
//! - **Local-first**: the cart is the single source of truth for the UI,
//!   regardless of what the remote authority thinks
//!
//! ## Core Concepts
//!
//! ### Line items
//!
//! A [`CartLineItem`] is one catalog entry the user intends to purchase,
//! keyed by its catalog `id`. Two entries sharing an `id` are the same
//! entry; there is no variant-level identity.
//!
//! ### The cart
//!
//! [`Cart`] maps `id` to line item, preserving insertion order for display.
//! Mutators follow increment-or-insert semantics and clamp quantities to
//! at least 1; entries are removed, never zero-quantitied.
//!
//! ### Checkout totals
//!
//! [`PricingRules`] turns a cart plus an ephemeral selection of ids into
//! [`CheckoutTotals`]: subtotal, tiered coupon discount, shipping against a
//! free-shipping threshold, and tax.
//!
//! ## Quick Start
//!
//! ```rust
//! use cart_core::{Cart, CartLineItem, PricingRules};
//!
//! let mut cart = Cart::new();
//! let shirt = CartLineItem::new("11111111-1111-1111-1111-111111111111", "Shirt", "/shirt.png", 10.0, 12.0);
//! cart.add_item(shirt, 2);
//!
//! assert_eq!(cart.count(), 2);
//!
//! let selection: Vec<String> = cart.in_stock_ids();
//! assert_eq!(cart.selected_total(&selection), 20.0);
//!
//! let totals = PricingRules::default().totals_for(&cart, &selection);
//! assert_eq!(totals.subtotal, 20.0);
//! ```

pub mod cart;
pub mod item;
pub mod totals;

// Re-export main types at crate root
pub use cart::Cart;
pub use item::CartLineItem;
pub use totals::{CheckoutTotals, CouponTier, PricingRules};

/// Type aliases for clarity
pub type ItemId = String;
pub type Quantity = u32;
