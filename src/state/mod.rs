//! Client-side application state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the auth session and its persisted copy, `gate` derives
//! what a protected route shows from it, `list` is the paged remote-list
//! controller, and `sources` adapts the scraping endpoints to it.

pub mod gate;
pub mod list;
pub mod session;
pub mod sources;
