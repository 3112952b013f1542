use std::rc::Rc;

use super::*;
use crate::net::storage::{KeyValueStore, MemoryStore};
use crate::state::session::{RegisterPolicy, SessionStore, StorageKeys};
use crate::test_helpers::{MockAuth, auth_response};

#[test]
fn empty_session_is_anonymous() {
    assert_eq!(select_view(&SessionState::default()), GateView::Anonymous);
}

#[test]
fn loading_wins_over_authenticated() {
    let auth = auth_response("u", "abc");
    let state = SessionState {
        user: Some(auth.user),
        access_token: Some(auth.access_token),
        is_loading: true,
        ..SessionState::default()
    };
    assert_eq!(select_view(&state), GateView::Loading);
}

#[test]
fn failed_auth_is_anonymous() {
    let state = SessionState { error: Some("Invalid credentials".to_owned()), ..SessionState::default() };
    assert_eq!(select_view(&state), GateView::Anonymous);
}

#[test]
fn persisted_session_renders_loading_before_restore() {
    let storage = MemoryStore::new();
    storage.set(
        "authData",
        r#"{"user":{"id":"1","username":"a","email":"a@b.com"},"accessToken":"tok"}"#,
    );
    let remote = Rc::new(MockAuth::default());
    let store = SessionStore::new(remote.clone(), storage, StorageKeys::default(), RegisterPolicy::default());

    assert_eq!(select_view(&store.state()), GateView::Loading);
    assert!(store.restore_session());
    assert_eq!(select_view(&store.state()), GateView::Authenticated);
    assert_eq!(remote.total_calls(), 0);
}

#[test]
fn malformed_session_resolves_to_anonymous_after_loading() {
    let storage = MemoryStore::new();
    storage.set("authData", "not json");
    let store = SessionStore::new(MockAuth::default(), storage, StorageKeys::default(), RegisterPolicy::default());

    assert_eq!(select_view(&store.state()), GateView::Loading);
    assert!(!store.restore_session());
    assert_eq!(select_view(&store.state()), GateView::Anonymous);
}
