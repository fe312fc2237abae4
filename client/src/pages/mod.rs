//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`.

pub mod admin;
pub mod auth;
pub mod home;
pub(crate) mod signin;
pub(crate) mod signup;
