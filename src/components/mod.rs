//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome and the generic table; pages wire them to
//! concrete list controllers and session state.

pub mod app_info;
pub mod data_table;
pub mod forgot_password;
pub mod header;
pub mod pagination;
pub mod theme_toggle;
