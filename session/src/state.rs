//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser client keeps one [`AuthSession`] in a Leptos signal provided
//! via context; route guards and user-aware components read it, and sign-in,
//! refresh and logout flows write it through the methods here.
//!
//! PERSISTENCE
//! ===========
//! Two things survive a reload:
//! - the token pair, owned by the [`TokenStore`] under its own keys;
//! - a `{ user, isAuthenticated }` snapshot under [`AUTH_SNAPSHOT_KEY`], in
//!   the `{"state": .., "version": 0}` envelope the web front-end has always
//!   written, so existing browser sessions carry over.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use serde::{Deserialize, Serialize};

use crate::api::SignedIn;
use crate::storage::Storage;
use crate::store::TokenStore;
use crate::types::{AuthUser, TokenPair};

/// Storage key of the persisted `{ user, isAuthenticated }` snapshot.
pub const AUTH_SNAPSHOT_KEY: &str = "auth-storage";

const SNAPSHOT_VERSION: u32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    SignedOut,
    Loading,
    SignedIn,
}

/// In-memory session values. `is_authenticated` always equals
/// `user.is_some()`; the fields are private so only [`AuthSession`] can
/// change them together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    user: Option<AuthUser>,
    tokens: Option<TokenPair>,
    is_authenticated: bool,
    is_loading: bool,
}

impl AuthState {
    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn tokens(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_loading {
            SessionStatus::Loading
        } else if self.is_authenticated {
            SessionStatus::SignedIn
        } else {
            SessionStatus::SignedOut
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    is_authenticated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEnvelope {
    state: Snapshot,
    #[serde(default)]
    version: u32,
}

/// Session context: the [`AuthState`] plus the token store it writes through.
#[derive(Clone, Debug, Default)]
pub struct AuthSession<S> {
    state: AuthState,
    tokens: TokenStore<S>,
}

impl<S: Storage> AuthSession<S> {
    /// Signed-out session over `storage`. Call [`initialize`](Self::initialize)
    /// to pick up a previous session.
    pub fn new(storage: S) -> Self {
        Self {
            state: AuthState::default(),
            tokens: TokenStore::new(storage),
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn token_store(&self) -> &TokenStore<S> {
        &self.tokens
    }

    /// Restore tokens and the persisted user snapshot. Does not fetch the
    /// profile; callers hydrate it with a `/me` request afterwards.
    pub fn initialize(&mut self) {
        self.state.tokens = self.tokens.tokens();
        self.state.user = self.load_snapshot();
        self.state.is_authenticated = self.state.user.is_some();
        log::debug!(
            "session initialized: tokens={} user={}",
            self.state.tokens.is_some(),
            self.state.user.is_some()
        );
    }

    /// Toggle the loading flag. User and tokens are untouched.
    pub fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
    }

    /// Replace the user and the authenticated flag together, then persist
    /// the snapshot.
    pub fn set_user(&mut self, user: Option<AuthUser>) {
        self.state.is_authenticated = user.is_some();
        self.state.user = user;
        self.save_snapshot();
    }

    /// Write `tokens` through to the store (clearing it on `None`), then
    /// update memory.
    pub fn set_tokens(&mut self, tokens: Option<TokenPair>) {
        match &tokens {
            Some(pair) => self.tokens.save_tokens(pair),
            None => self.tokens.clear_tokens(),
        }
        self.state.tokens = tokens;
    }

    /// Adopt a completed sign-in.
    pub fn apply_sign_in(&mut self, signed_in: SignedIn) {
        self.set_tokens(Some(signed_in.tokens));
        self.set_user(Some(signed_in.user));
    }

    /// Clear stored tokens and reset user, tokens and the flag together.
    pub fn logout(&mut self) {
        self.tokens.clear_tokens();
        self.state.user = None;
        self.state.tokens = None;
        self.state.is_authenticated = false;
        self.save_snapshot();
        log::info!("session cleared");
    }

    fn load_snapshot(&self) -> Option<AuthUser> {
        let raw = match self.tokens.storage().get_item(AUTH_SNAPSHOT_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::error!("failed to read {AUTH_SNAPSHOT_KEY}: {e}");
                return None;
            }
        };
        match serde_json::from_str::<SnapshotEnvelope>(&raw) {
            Ok(envelope) => envelope.state.user,
            Err(e) => {
                log::warn!("ignoring unreadable {AUTH_SNAPSHOT_KEY}: {e}");
                None
            }
        }
    }

    fn save_snapshot(&self) {
        let envelope = SnapshotEnvelope {
            state: Snapshot {
                user: self.state.user.clone(),
                is_authenticated: self.state.is_authenticated,
            },
            version: SNAPSHOT_VERSION,
        };
        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("failed to encode {AUTH_SNAPSHOT_KEY}: {e}");
                return;
            }
        };
        if let Err(e) = self.tokens.storage().set_item(AUTH_SNAPSHOT_KEY, &raw) {
            log::error!("failed to save {AUTH_SNAPSHOT_KEY}: {e}");
        }
    }
}
