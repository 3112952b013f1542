//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`SessionStore`] is the single writer of session state and of the persisted
//! session keys. The auth gate, header, and auth page read [`SessionState`]
//! snapshots pushed to them through [`SessionStore::subscribe`].
//!
//! DESIGN
//! ======
//! Transitions are a pure [`reduce`] over [`SessionAction`]; the async
//! operations only sequence remote calls, persistence, and dispatches.
//! Restoring a persisted session trusts local data and makes no remote call.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::net::api::AuthRemote;
use crate::net::error::ApiError;
use crate::net::storage::{KeyValueStore, load_json, save_json};
use crate::net::types::{AuthResponse, LoginRequest, RegisterRequest, User};

pub const DEFAULT_SESSION_KEY: &str = "authData";
pub const DEFAULT_TOKEN_KEY: &str = "accessToken";

/// Coarse phase derived from [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticating,
    Authenticated,
    AuthFailed,
}

/// What a successful registration does to the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegisterPolicy {
    /// Stay anonymous, flag success, and let the form switch to login.
    #[default]
    ReturnToLogin,
    /// Persist the issued credential and authenticate immediately.
    SignIn,
}

/// Snapshot of the client-side session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub registration_success: bool,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_loading {
            SessionStatus::Authenticating
        } else if self.is_authenticated() {
            SessionStatus::Authenticated
        } else if self.error.is_some() {
            SessionStatus::AuthFailed
        } else {
            SessionStatus::Anonymous
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    AuthStart,
    AuthSuccess(AuthResponse),
    AuthFailure(String),
    /// Registration accepted; carries the session only under [`RegisterPolicy::SignIn`].
    Registered(Option<AuthResponse>),
    /// Nothing usable was persisted.
    RestoreSkipped,
    Logout,
    ClearError,
}

/// Pure transition function.
#[must_use]
pub fn reduce(state: &SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::AuthStart => SessionState {
            is_loading: true,
            error: None,
            registration_success: false,
            ..state.clone()
        },
        SessionAction::AuthSuccess(auth) => SessionState {
            user: Some(auth.user),
            access_token: Some(auth.access_token),
            is_loading: false,
            error: None,
            registration_success: state.registration_success,
        },
        SessionAction::AuthFailure(message) => SessionState {
            user: None,
            access_token: None,
            is_loading: false,
            error: Some(message),
            registration_success: false,
        },
        SessionAction::Registered(session) => {
            let (user, access_token) = match session {
                Some(auth) => (Some(auth.user), Some(auth.access_token)),
                None => (None, None),
            };
            SessionState { user, access_token, is_loading: false, error: None, registration_success: true }
        }
        SessionAction::RestoreSkipped => SessionState { is_loading: false, ..state.clone() },
        SessionAction::Logout => SessionState::default(),
        SessionAction::ClearError => SessionState { error: None, ..state.clone() },
    }
}

/// Storage keys for the persisted session record and the bare bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    pub session: String,
    pub token: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self { session: DEFAULT_SESSION_KEY.to_owned(), token: DEFAULT_TOKEN_KEY.to_owned() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    user: User,
    access_token: String,
}

type Listener = Box<dyn Fn(&SessionState)>;

/// Authoritative holder of the session; every transition goes through it.
pub struct SessionStore<A, S> {
    remote: A,
    storage: S,
    keys: StorageKeys,
    policy: RegisterPolicy,
    state: RefCell<SessionState>,
    listener: RefCell<Option<Listener>>,
}

impl<A: AuthRemote, S: KeyValueStore> SessionStore<A, S> {
    /// Build a store. Starts in the loading phase when a persisted session is
    /// waiting for [`SessionStore::restore_session`], so the first render is a
    /// placeholder rather than the anonymous view.
    pub fn new(remote: A, storage: S, keys: StorageKeys, policy: RegisterPolicy) -> Self {
        let pending_restore = storage.get(&keys.session).is_some();
        let state = SessionState { is_loading: pending_restore, ..SessionState::default() };
        Self { remote, storage, keys, policy, state: RefCell::new(state), listener: RefCell::new(None) }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn policy(&self) -> RegisterPolicy {
        self.policy
    }

    /// Register the single observer notified after every transition.
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    fn dispatch(&self, action: SessionAction) {
        let next = reduce(&self.state.borrow(), action);
        self.state.replace(next.clone());
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(&next);
        }
    }

    /// Rebuild the session from persisted data without contacting the server.
    ///
    /// Returns whether a session was restored. Absent or malformed data leaves
    /// the store anonymous.
    pub fn restore_session(&self) -> bool {
        match self.load_persisted() {
            Some(persisted) => {
                log::debug!("restored session for {}", persisted.user.username);
                self.dispatch(SessionAction::AuthSuccess(AuthResponse {
                    user: persisted.user,
                    access_token: persisted.access_token,
                }));
                true
            }
            None => {
                self.dispatch(SessionAction::RestoreSkipped);
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns the remote failure after recording its message in `error`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.dispatch(SessionAction::AuthStart);
        let request = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        match self.remote.login(&request).await {
            Ok(auth) => {
                self.persist(&auth);
                log::info!("user logged in: {}", auth.user.email);
                self.dispatch(SessionAction::AuthSuccess(auth));
                Ok(())
            }
            Err(e) => {
                self.dispatch(SessionAction::AuthFailure(e.message_or("Login failed").to_owned()));
                Err(e)
            }
        }
    }

    /// # Errors
    ///
    /// Returns the remote failure after recording its message in `error`.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        self.dispatch(SessionAction::AuthStart);
        let request =
            RegisterRequest { username: username.to_owned(), email: email.to_owned(), password: password.to_owned() };
        match self.remote.register(&request).await {
            Ok(auth) => {
                log::info!("user registered: {}", auth.user.email);
                let session = match self.policy {
                    RegisterPolicy::SignIn => {
                        self.persist(&auth);
                        Some(auth)
                    }
                    RegisterPolicy::ReturnToLogin => None,
                };
                self.dispatch(SessionAction::Registered(session));
                Ok(())
            }
            Err(e) => {
                self.dispatch(SessionAction::AuthFailure(e.message_or("Registration failed").to_owned()));
                Err(e)
            }
        }
    }

    /// Invalidate remotely when possible, then always clear local state.
    pub async fn logout(&self) {
        if let Err(e) = self.remote.logout().await {
            log::warn!("logout call failed, clearing local session anyway: {e}");
        }
        self.clear_persisted();
        self.dispatch(SessionAction::Logout);
        log::info!("user logged out");
    }

    pub fn clear_error(&self) {
        self.dispatch(SessionAction::ClearError);
    }

    fn load_persisted(&self) -> Option<PersistedSession> {
        let persisted: PersistedSession = load_json(&self.storage, &self.keys.session)?;
        if persisted.access_token.is_empty() || persisted.user.username.is_empty() {
            log::warn!("persisted session is incomplete; ignoring");
            return None;
        }
        Some(persisted)
    }

    fn persist(&self, auth: &AuthResponse) {
        let record = PersistedSession { user: auth.user.clone(), access_token: auth.access_token.clone() };
        save_json(&self.storage, &self.keys.session, &record);
        self.storage.set(&self.keys.token, &auth.access_token);
    }

    fn clear_persisted(&self) {
        self.storage.remove(&self.keys.session);
        self.storage.remove(&self.keys.token);
    }
}
