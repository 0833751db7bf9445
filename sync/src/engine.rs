//! CartSyncEngine - debounced, filtered cart synchronization.
//!
//! The engine observes the auth signal and the store's mutation events.
//! A transition to signed-in triggers hydration: a full pull that replaces
//! the local cart wholesale. User mutations while signed in (re)start a
//! trailing debounce window; when it elapses, the current cart is filtered
//! to remote-key-shaped entries and pushed as a whole. Authority failures
//! are logged and swallowed; the local cart stays authoritative.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

use crate::auth::AuthReceiver;
use crate::authority::{is_remote_key_shaped, RemoteCartAuthority};
use crate::store::{CartEvent, CartStore, MutationOrigin};

/// Quiescence required after the last mutation before a push fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(900);

/// Window after a successful pull during which mutations do not schedule a
/// push, suppressing echoes of the hydration itself.
pub const DEFAULT_HYDRATION_GUARD: Duration = Duration::from_millis(500);

/// Engine timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub debounce: Duration,
    pub hydration_guard: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            hydration_guard: DEFAULT_HYDRATION_GUARD,
        }
    }
}

impl SyncConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_hydration_guard(mut self, guard: Duration) -> Self {
        self.hydration_guard = guard;
        self
    }
}

/// Keeps a best-effort copy of the cart's remotely-syncable entries in the
/// remote authority, and seeds the cart from it on sign-in.
///
/// Holds explicit references to its collaborators; nothing here is ambient
/// state. Drive it with [`CartSyncEngine::run`], typically on a spawned
/// task owned by the composition root.
pub struct CartSyncEngine<A> {
    store: CartStore,
    authority: A,
    auth: AuthReceiver,
    config: SyncConfig,
    /// Most recent successful hydration
    last_pull: Option<Instant>,
    /// Most recent successful push
    last_push: Option<Instant>,
    /// Single-slot debounce deadline; rescheduling replaces it
    pending_push: Option<Instant>,
}

impl<A: RemoteCartAuthority> CartSyncEngine<A> {
    pub fn new(store: CartStore, authority: A, auth: AuthReceiver) -> Self {
        Self::with_config(store, authority, auth, SyncConfig::default())
    }

    pub fn with_config(
        store: CartStore,
        authority: A,
        auth: AuthReceiver,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            authority,
            auth,
            config,
            last_pull: None,
            last_push: None,
            pending_push: None,
        }
    }

    /// Run until the auth signal or the store goes away.
    ///
    /// The loop suspends only on the authority calls themselves; mutations
    /// landing during an in-flight call coalesce on the watch channel and
    /// start a fresh debounce window afterwards, superseding rather than
    /// queuing.
    pub async fn run(mut self) {
        let mut auth = self.auth.clone();
        let mut events = self.store.subscribe();
        // The channels' initial values are not transitions
        auth.mark_unchanged();
        events.mark_unchanged();

        let mut authed = auth.borrow().is_authenticated();
        if authed {
            // Already signed in at mount
            self.hydrate().await;
        }

        loop {
            let deadline = self.pending_push.unwrap_or_else(Instant::now);
            tokio::select! {
                changed = auth.changed() => {
                    if changed.is_err() {
                        tracing::debug!("auth signal closed; stopping sync engine");
                        break;
                    }
                    let now_authed = auth.borrow_and_update().is_authenticated();
                    if now_authed && !authed {
                        self.hydrate().await;
                    } else if !now_authed {
                        // Pushes only happen while signed in; the cart
                        // itself is left untouched on sign-out
                        self.pending_push = None;
                    }
                    authed = now_authed;
                }
                changed = events.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let event = *events.borrow_and_update();
                    self.observe(event, authed);
                }
                _ = sleep_until(deadline), if self.pending_push.is_some() => {
                    self.pending_push = None;
                    self.flush().await;
                }
            }
        }
    }

    /// React to one observed cart mutation.
    fn observe(&mut self, event: CartEvent, authed: bool) {
        if !authed || event.origin == MutationOrigin::Hydration {
            return;
        }
        if let Some(pulled) = self.last_pull {
            if pulled.elapsed() < self.config.hydration_guard {
                tracing::debug!(
                    revision = event.revision,
                    "mutation inside hydration guard; not scheduling push"
                );
                return;
            }
        }
        self.pending_push = Some(Instant::now() + self.config.debounce);
        tracing::debug!(revision = event.revision, "debounce window restarted");
    }

    /// Pull the remote cart and replace local contents wholesale.
    ///
    /// Guest entries present before sign-in are discarded, not merged; the
    /// server is the sole source of truth once authenticated. On failure
    /// the local cart is left untouched and no retry is scheduled.
    async fn hydrate(&mut self) {
        let Some(user_id) = self.auth.borrow().user_id().map(str::to_owned) else {
            return;
        };
        match self.authority.pull(&user_id).await {
            Ok(items) => {
                let count = items.len();
                self.store.set_items(items);
                self.last_pull = Some(Instant::now());
                tracing::info!(user_id = %user_id, items = count, "cart hydrated from remote");
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "cart pull failed; keeping local cart");
            }
        }
    }

    /// Push the remote-key-shaped subset of the current cart.
    ///
    /// Local-only entries are excluded silently; an all-local cart pushes
    /// nothing. Failures leave local state untouched and unreported.
    async fn flush(&mut self) {
        let Some(user_id) = self.auth.borrow().user_id().map(str::to_owned) else {
            return;
        };
        let items: Vec<_> = self
            .store
            .items()
            .into_iter()
            .filter(|item| is_remote_key_shaped(&item.id))
            .collect();
        if items.is_empty() {
            tracing::debug!("no remote-keyed items in cart; skipping push");
            return;
        }

        let count = items.len();
        let gap_ms = self.last_push.map(|t| t.elapsed().as_millis() as u64);
        match self.authority.push(&user_id, items).await {
            Ok(()) => {
                self.last_push = Some(Instant::now());
                tracing::debug!(user_id = %user_id, items = count, ?gap_ms, "cart pushed");
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "cart push failed; local cart remains authoritative");
            }
        }
    }
}
