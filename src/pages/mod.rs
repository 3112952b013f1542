//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its route-scoped list controllers and delegates rendering
//! details to `components`.

pub mod auth;
pub mod dashboard;
pub mod links;
