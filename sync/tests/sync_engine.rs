//! End-to-end tests for the cart sync engine.
//!
//! These drive a real engine task against a recording in-memory authority,
//! with tokio's clock paused so debounce and guard windows are exact.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cart_sync::{
    auth_channel, AuthState, AuthorityError, CartLineItem, CartStore, CartSyncEngine,
    RemoteCartAuthority,
};
use tokio::time::advance;

const SHIRT_ID: &str = "11111111-1111-1111-1111-111111111111";
const SOCKS_ID: &str = "22222222-2222-2222-2222-222222222222";

#[derive(Clone, Default)]
struct RecordingAuthority {
    state: Arc<Mutex<AuthorityState>>,
}

#[derive(Default)]
struct AuthorityState {
    pull_result: Vec<CartLineItem>,
    fail_pull: bool,
    fail_push: bool,
    pulls: usize,
    pushes: Vec<Vec<CartLineItem>>,
}

impl RecordingAuthority {
    fn serving(items: Vec<CartLineItem>) -> Self {
        let authority = Self::default();
        authority.state.lock().unwrap().pull_result = items;
        authority
    }

    fn pulls(&self) -> usize {
        self.state.lock().unwrap().pulls
    }

    fn pushes(&self) -> Vec<Vec<CartLineItem>> {
        self.state.lock().unwrap().pushes.clone()
    }
}

impl RemoteCartAuthority for RecordingAuthority {
    async fn pull(&self, _user_id: &str) -> Result<Vec<CartLineItem>, AuthorityError> {
        let mut state = self.state.lock().unwrap();
        state.pulls += 1;
        if state.fail_pull {
            Err(AuthorityError::Unavailable("offline".into()))
        } else {
            Ok(state.pull_result.clone())
        }
    }

    async fn push(
        &self,
        _user_id: &str,
        items: Vec<CartLineItem>,
    ) -> Result<(), AuthorityError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_push {
            return Err(AuthorityError::Rejected("write refused".into()));
        }
        state.pushes.push(items);
        Ok(())
    }
}

fn item(id: &str, name: &str, price: f64) -> CartLineItem {
    CartLineItem::new(id, name, format!("/{name}.png"), price, price)
}

/// Let the spawned engine task process everything currently observable.
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Advance past the post-hydration guard so user mutations schedule pushes.
async fn pass_guard() {
    advance(Duration::from_millis(500)).await;
    settle().await;
}

#[tokio::test(start_paused = true)]
async fn hydration_replaces_guest_cart() {
    let store = CartStore::new();
    store.add_item(item("guest-1", "Hat", 5.0), 2);

    let authority = RecordingAuthority::serving(vec![item(SHIRT_ID, "Shirt", 10.0)]);
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());
    settle().await;

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;

    // Full replace, not a merge: the guest entry is gone
    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, SHIRT_ID);
    assert_eq!(store.count(), 1);
    assert_eq!(authority.pulls(), 1);
}

#[tokio::test(start_paused = true)]
async fn hydrates_at_mount_when_already_signed_in() {
    let store = CartStore::new();
    let authority = RecordingAuthority::serving(vec![item(SHIRT_ID, "Shirt", 10.0)]);
    let (tx, rx) = auth_channel();
    tx.send_replace(AuthState::signed_in("user-1"));

    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());
    settle().await;

    assert_eq!(authority.pulls(), 1);
    assert_eq!(store.item_quantity(SHIRT_ID), 1);
}

#[tokio::test(start_paused = true)]
async fn pull_failure_leaves_cart_untouched_with_no_retry() {
    let store = CartStore::new();
    store.add_item(item("guest-1", "Hat", 5.0), 2);

    let authority = RecordingAuthority::default();
    authority.state.lock().unwrap().fail_pull = true;
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;

    assert_eq!(store.item_quantity("guest-1"), 2);
    assert_eq!(authority.pulls(), 1);

    // No automatic retry; only the next transition pulls again
    advance(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(authority.pulls(), 1);
}

#[tokio::test(start_paused = true)]
async fn debounce_coalesces_rapid_mutations_into_one_push() {
    let store = CartStore::new();
    let authority = RecordingAuthority::default();
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;
    pass_guard().await;

    store.add_item(item(SHIRT_ID, "Shirt", 10.0), 1);
    settle().await;
    advance(Duration::from_millis(300)).await;

    store.update_quantity(SHIRT_ID, 4);
    settle().await;
    advance(Duration::from_millis(300)).await;

    store.add_item(item(SOCKS_ID, "Socks", 3.0), 1);
    settle().await;

    // Two windows already restarted without firing
    assert_eq!(authority.pushes().len(), 0);

    advance(Duration::from_millis(900)).await;
    settle().await;

    let pushes = authority.pushes();
    assert_eq!(pushes.len(), 1);
    let payload = &pushes[0];
    assert_eq!(payload.len(), 2);
    assert_eq!(payload[0].id, SHIRT_ID);
    assert_eq!(payload[0].quantity, 4); // state as of the last mutation
    assert_eq!(payload[1].id, SOCKS_ID);
}

#[tokio::test(start_paused = true)]
async fn push_filters_out_local_only_ids() {
    let store = CartStore::new();
    let authority = RecordingAuthority::default();
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;
    pass_guard().await;

    store.add_item(item(SHIRT_ID, "Shirt", 10.0), 1);
    store.add_item(item("mock-1", "Hat", 5.0), 1);
    settle().await;

    advance(Duration::from_millis(900)).await;
    settle().await;

    let pushes = authority.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].len(), 1);
    assert_eq!(pushes[0][0].id, SHIRT_ID);

    // The local-only entry stays in the cart regardless
    assert_eq!(store.item_quantity("mock-1"), 1);
}

#[tokio::test(start_paused = true)]
async fn all_local_cart_pushes_nothing() {
    let store = CartStore::new();
    let authority = RecordingAuthority::default();
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;
    pass_guard().await;

    store.add_item(item("mock-1", "Hat", 5.0), 1);
    settle().await;

    advance(Duration::from_millis(900)).await;
    settle().await;

    assert!(authority.pushes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn hydration_alone_never_pushes() {
    let store = CartStore::new();
    let authority = RecordingAuthority::serving(vec![item(SHIRT_ID, "Shirt", 10.0)]);
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;

    advance(Duration::from_secs(10)).await;
    settle().await;

    assert_eq!(authority.pulls(), 1);
    assert!(authority.pushes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn mutation_inside_guard_window_is_not_scheduled() {
    let store = CartStore::new();
    let authority = RecordingAuthority::default();
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;

    // Still inside the 500ms post-hydration guard
    store.add_item(item(SHIRT_ID, "Shirt", 10.0), 1);
    settle().await;

    advance(Duration::from_secs(10)).await;
    settle().await;
    assert!(authority.pushes().is_empty());

    // A mutation after the guard behaves normally
    store.update_quantity(SHIRT_ID, 2);
    settle().await;
    advance(Duration::from_millis(900)).await;
    settle().await;
    assert_eq!(authority.pushes().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn no_sync_while_signed_out() {
    let store = CartStore::new();
    let authority = RecordingAuthority::default();
    let (_tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());
    settle().await;

    store.add_item(item(SHIRT_ID, "Shirt", 10.0), 1);
    settle().await;

    advance(Duration::from_secs(10)).await;
    settle().await;

    assert_eq!(authority.pulls(), 0);
    assert!(authority.pushes().is_empty());
    // The guest cart keeps working
    assert_eq!(store.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn sign_out_drops_pending_push() {
    let store = CartStore::new();
    let authority = RecordingAuthority::default();
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;
    pass_guard().await;

    store.add_item(item(SHIRT_ID, "Shirt", 10.0), 1);
    settle().await;

    tx.send_replace(AuthState::SignedOut);
    settle().await;

    advance(Duration::from_secs(10)).await;
    settle().await;

    assert!(authority.pushes().is_empty());
    // The cart is not cleared on sign-out
    assert_eq!(store.item_quantity(SHIRT_ID), 1);
}

#[tokio::test(start_paused = true)]
async fn push_failure_is_swallowed_and_later_pushes_recover() {
    let store = CartStore::new();
    let authority = RecordingAuthority::default();
    authority.state.lock().unwrap().fail_push = true;
    let (tx, rx) = auth_channel();
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());

    tx.send_replace(AuthState::signed_in("user-1"));
    settle().await;
    pass_guard().await;

    store.add_item(item(SHIRT_ID, "Shirt", 10.0), 1);
    settle().await;
    advance(Duration::from_millis(900)).await;
    settle().await;

    // The failed push changed nothing locally
    assert!(authority.pushes().is_empty());
    assert_eq!(store.item_quantity(SHIRT_ID), 1);

    // Sync recovers on the next cycle once the authority is back
    authority.state.lock().unwrap().fail_push = false;
    store.update_quantity(SHIRT_ID, 3);
    settle().await;
    advance(Duration::from_millis(900)).await;
    settle().await;

    let pushes = authority.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0][0].quantity, 3);
}

#[tokio::test(start_paused = true)]
async fn signed_in_session_end_to_end() {
    let store = CartStore::new();
    let authority = RecordingAuthority::serving(vec![item(SHIRT_ID, "Shirt", 10.0)]);
    let (tx, rx) = auth_channel();
    tx.send_replace(AuthState::signed_in("user-1"));
    tokio::spawn(CartSyncEngine::new(store.clone(), authority.clone(), rx).run());
    settle().await;

    // Hydrated to the single remote item
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.count(), 1);

    pass_guard().await;
    store.add_item(item("mock-1", "Hat", 5.0), 1);
    settle().await;

    assert_eq!(store.items().len(), 2);
    assert_eq!(store.count(), 2);

    advance(Duration::from_millis(900)).await;
    settle().await;

    // The push carries only the remote-keyed entry
    let pushes = authority.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].len(), 1);
    assert_eq!(pushes[0][0].id, SHIRT_ID);
}
