//! Networking and persistence collaborators.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` sends requests, `api` names the backend endpoints, `storage` wraps
//! `localStorage`, `error` is the shared failure type, and `types` defines the
//! wire schema.

pub mod api;
pub mod error;
pub mod http;
pub mod storage;
pub mod types;
