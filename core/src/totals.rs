//! Checkout total derivation: coupon tiers, shipping threshold, tax.
//!
//! All computations are pure functions over a cart and an ephemeral
//! selection of ids. The selection is owned by the UI and recomputed there
//! whenever the cart changes shape; nothing here is persisted.

use crate::Cart;
use serde::{Deserialize, Serialize};

/// One coupon tier: a flat discount unlocked at a minimum subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponTier {
    /// Selection subtotal required to unlock this tier
    pub min_subtotal: f64,
    /// Flat amount taken off the subtotal
    pub discount: f64,
}

impl CouponTier {
    pub fn new(min_subtotal: f64, discount: f64) -> Self {
        Self {
            min_subtotal,
            discount,
        }
    }
}

/// The storefront's pricing rules.
///
/// The best applicable coupon tier (highest `min_subtotal` not exceeding
/// the subtotal) wins; shipping is waived once the discounted subtotal
/// reaches the free-shipping threshold; tax applies to the discounted
/// subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRules {
    pub coupon_tiers: Vec<CouponTier>,
    pub free_shipping_threshold: f64,
    pub shipping_fee: f64,
    pub tax_rate: f64,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            coupon_tiers: vec![
                CouponTier::new(50.0, 5.0),
                CouponTier::new(100.0, 15.0),
                CouponTier::new(200.0, 40.0),
            ],
            free_shipping_threshold: 75.0,
            shipping_fee: 6.99,
            tax_rate: 0.08,
        }
    }
}

/// Derived totals for a checkout selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}

impl PricingRules {
    /// The best coupon tier unlocked by `subtotal`, if any.
    pub fn best_tier(&self, subtotal: f64) -> Option<&CouponTier> {
        self.coupon_tiers
            .iter()
            .filter(|t| subtotal >= t.min_subtotal)
            .max_by(|a, b| a.min_subtotal.total_cmp(&b.min_subtotal))
    }

    /// Compute checkout totals for the entries of `cart` whose ids are in
    /// `selected_ids`. An empty selection yields all zeros, with no
    /// shipping fee charged on nothing.
    pub fn totals_for<S: AsRef<str>>(&self, cart: &Cart, selected_ids: &[S]) -> CheckoutTotals {
        let subtotal = cart.selected_total(selected_ids);
        if subtotal == 0.0 {
            return CheckoutTotals::default();
        }

        let discount = self.best_tier(subtotal).map(|t| t.discount).unwrap_or(0.0);
        let discounted = subtotal - discount;
        let shipping = if discounted >= self.free_shipping_threshold {
            0.0
        } else {
            self.shipping_fee
        };
        let tax = discounted * self.tax_rate;

        CheckoutTotals {
            subtotal,
            discount,
            shipping,
            tax,
            total: discounted + shipping + tax,
        }
    }
}
