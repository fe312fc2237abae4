//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and form rules live here so pages stay declarative and the
//! rules stay testable without a browser.

pub mod auth;
pub mod validation;
