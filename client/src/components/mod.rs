//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components are presentation only; pages own the session signal and pass
//! callbacks down.

pub mod loading_button;
pub mod sidebar;
pub mod social_login;
