//! Browser adapters for the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! `browser` backs token storage and navigation with `window`, `transport`
//! sends requests with `gloo-net`, and `api` assembles them into the auth
//! client the pages call.

#[cfg(feature = "csr")]
pub mod api;
pub mod browser;
#[cfg(feature = "csr")]
pub mod transport;
