//! Utility helpers shared across pages and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `validation` holds the pure form checks; `theme` isolates the browser
//! glue for the light/dark preference.

pub mod theme;
pub mod validation;
