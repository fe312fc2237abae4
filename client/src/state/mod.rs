//! Shared client-side state.
//!
//! DESIGN
//! ======
//! The only app-wide state is the auth session; form state is local to the
//! page that owns the form.

pub mod auth;
