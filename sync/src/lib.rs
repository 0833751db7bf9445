//! # Cart Sync
//!
//! The observable cart store and its synchronization engine.
//!
//! This crate wraps the pure [`cart_core`] state in a cheaply-cloneable,
//! observable [`CartStore`] handle, and runs a [`CartSyncEngine`] that keeps
//! a best-effort copy of the cart's remotely-syncable entries in a
//! [`RemoteCartAuthority`], gated by the authentication lifecycle.
//!
//! ## Control flow
//!
//! UI code calls [`CartStore`] mutators directly for instant feedback. Every
//! mutation publishes a [`CartEvent`] on a watch channel; the engine observes
//! these and schedules a trailing-debounce push (900 ms of quiescence). When
//! the auth signal transitions to signed-in, the engine pulls from the
//! authority and replaces the cart wholesale; guest entries are discarded,
//! the server being the sole source of truth once authenticated.
//!
//! ## Failure posture
//!
//! Authority failures are logged and swallowed. The local cart is always
//! the UI's source of truth; sync can fail perpetually without the user
//! ever losing a usable cart.

pub mod auth;
pub mod authority;
pub mod engine;
pub mod store;

// Re-export main types at crate root
pub use auth::{auth_channel, AuthReceiver, AuthSender, AuthState};
pub use authority::{is_remote_key_shaped, AuthorityError, RemoteCartAuthority};
pub use engine::{CartSyncEngine, SyncConfig};
pub use store::{CartEvent, CartStore, MutationOrigin};

// Re-export the state types callers hold alongside the store
pub use cart_core::{Cart, CartLineItem, CheckoutTotals, CouponTier, PricingRules};
