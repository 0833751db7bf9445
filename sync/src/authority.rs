//! Remote cart authority port.
//!
//! The authority is the hosted backend's cart table, reachable only through
//! two primitives: a full pull and an upsert-by-id push. No delete
//! propagation exists; entries removed locally are simply omitted from
//! future pushes.

use std::future::Future;

use cart_core::CartLineItem;
use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by a remote cart authority.
///
/// The engine logs these and moves on; they never reach the UI.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("authority unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Remote persistence for a user's cart.
///
/// Implementations must be thread-safe (`Send + Sync`). `push` upserts by
/// item id; the entire filtered set is sent each time, not a diff.
pub trait RemoteCartAuthority: Send + Sync {
    /// Fetch the user's full remote cart.
    fn pull(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<CartLineItem>, AuthorityError>> + Send;

    /// Upsert the given items into the user's remote cart.
    fn push(
        &self,
        user_id: &str,
        items: Vec<CartLineItem>,
    ) -> impl Future<Output = Result<(), AuthorityError>> + Send;
}

/// Whether `id` is shaped like a remote-authority primary key (a canonical
/// UUID), as opposed to a locally-fabricated display-only id.
///
/// Purely syntactic; a well-shaped id may still have no remote row.
pub fn is_remote_key_shaped(id: &str) -> bool {
    Uuid::try_parse(id).is_ok()
}
