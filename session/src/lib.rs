//! Client-side session core for the HotelSocial front-end.
//!
//! This crate owns everything the browser client and the CLI share about an
//! authenticated session: decoding access-token claims, persisting the token
//! pair, the auth request layer with its middleware chain, and the session
//! state holder. It is platform-neutral; storage, transport and navigation
//! are traits implemented by each front-end.
//!
//! FLOW
//! ====
//! form submit -> [`api::AuthApi`] -> [`claims::user_info`] gate ->
//! [`store::TokenStore`] persists -> [`state::AuthSession`] updates.

pub mod api;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod state;
pub mod storage;
pub mod store;
pub mod types;

pub use api::{AuthApi, SignedIn};
pub use config::ApiConfig;
pub use error::{ApiError, ErrorKind};
pub use http::{HttpRequest, HttpResponse, Method, Transport};
pub use middleware::{MiddlewareChain, Navigator};
pub use state::{AuthSession, AuthState, SessionStatus};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use store::TokenStore;
pub use types::{AuthUser, TokenPair};
