//! Persistent access/refresh token pair.
//!
//! TRADE-OFFS
//! ==========
//! Storage failures (quota exceeded, storage disabled) are logged and
//! swallowed: reads degrade to `None`, writes to a no-op. A broken backend
//! signs the user out instead of crashing the UI.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use crate::storage::Storage;
use crate::types::TokenPair;

/// Storage key holding the raw access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key holding the raw refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Token persistence over any [`Storage`] backend.
#[derive(Clone, Debug, Default)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: Storage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Backend this store writes to.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::error!("failed to read {key}: {e}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            log::error!("failed to save {key}: {e}");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            log::error!("failed to remove {key}: {e}");
        }
    }

    pub fn save_access_token(&self, token: &str) {
        self.write(ACCESS_TOKEN_KEY, token);
    }

    pub fn save_refresh_token(&self, token: &str) {
        self.write(REFRESH_TOKEN_KEY, token);
    }

    pub fn save_tokens(&self, tokens: &TokenPair) {
        self.save_access_token(&tokens.access_token);
        self.save_refresh_token(&tokens.refresh_token);
    }

    /// Replace only the access token, keeping the stored refresh token.
    pub fn update_access_token(&self, token: &str) {
        self.save_access_token(token);
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Both tokens, or `None` if either is missing. A lone token is never
    /// returned as half a pair.
    pub fn tokens(&self) -> Option<TokenPair> {
        Some(TokenPair {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
        })
    }

    pub fn remove_access_token(&self) {
        self.remove(ACCESS_TOKEN_KEY);
    }

    pub fn remove_refresh_token(&self) {
        self.remove(REFRESH_TOKEN_KEY);
    }

    pub fn clear_tokens(&self) {
        self.remove_access_token();
        self.remove_refresh_token();
    }

    pub fn has_tokens(&self) -> bool {
        self.tokens().is_some()
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token().is_some()
    }
}
