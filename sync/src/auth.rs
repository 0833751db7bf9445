//! Authentication signal consumed by the sync engine.
//!
//! The session subsystem owns the sender half and publishes transitions;
//! the engine (and anything else that cares) subscribes to the receiver.

use tokio::sync::watch;

/// Snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No session; the cart operates in guest mode
    #[default]
    SignedOut,
    /// Active session for `user_id`
    SignedIn { user_id: String },
}

impl AuthState {
    /// Construct the signed-in state.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self::SignedIn {
            user_id: user_id.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    /// The session's user id, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::SignedOut => None,
            Self::SignedIn { user_id } => Some(user_id),
        }
    }
}

/// Sender half of the auth signal, held by the session subsystem.
pub type AuthSender = watch::Sender<AuthState>;

/// Receiver half of the auth signal, held by the sync engine.
pub type AuthReceiver = watch::Receiver<AuthState>;

/// Create an auth signal starting signed out.
pub fn auth_channel() -> (AuthSender, AuthReceiver) {
    watch::channel(AuthState::SignedOut)
}
