//! Page-lifetime authentication state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `AuthContext` exists per page load (or CLI invocation). It is the only
//! writer of the token store besides the API client's 401 handling, and it
//! keeps the in-memory [`Session`] and the stored credential in lockstep:
//! a session is only ever published for a credential that decoded cleanly,
//! had not expired, and whose owner's profile could be fetched.
//!
//! CONCURRENCY
//! ===========
//! Startup restoration, `login` and `logout` may interleave at await points.
//! Every explicit transition bumps a generation counter; an async sequence
//! captures the generation when it starts and may only commit while that
//! generation is still current. `logout` is synchronous and bumps the
//! generation, so an in-flight restore or login can never resurrect a session
//! it cleared. `login` bumps on entry, superseding any in-flight restore.
//! A 401 from any authenticated request is a transition too: the API client
//! calls back into the context, which bumps and drops the session.
//! Locks are never held across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use time::OffsetDateTime;

use crate::api::{ApiClient, RequestOptions};
use crate::claims::{self, Claims};
use crate::clock::Clock;
use crate::endpoints;
use crate::error::{ApiError, LoginError};
use crate::guard::LOGIN_ROUTE;
use crate::types::{LoginRequest, LoginResponse, Profile};

pub const LOGIN_PATH: &str = "/auth/apiLogin";
const LOGIN_STATUS_OK: &str = "OK";

// =============================================================================
// SESSION
// =============================================================================

/// The authenticated user as far as the UI is concerned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    /// Display name from the profile record.
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub authorities: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    #[must_use]
    pub fn compose(claims: Claims, profile: Profile) -> Self {
        let expires_at = claims.expires_at();
        Self {
            username: claims.username,
            name: profile.name,
            email: profile.email.filter(|v| !v.is_empty()),
            mobile: profile.mobile_number.filter(|v| !v.is_empty()),
            authorities: claims.authorities,
            expires_at,
        }
    }

    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|held| held == authority)
    }

    /// Profile name, falling back to the username when the profile has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() { &self.username } else { &self.name }
    }

    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Initializing,
    Anonymous,
    Authenticated(Session),
}

impl AuthState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&AuthState) + Send + Sync>;

struct Inner {
    state: AuthState,
    generation: u64,
    initialized: bool,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

// =============================================================================
// AUTH CONTEXT
// =============================================================================

pub struct AuthContext {
    api: Arc<ApiClient>,
    clock: Arc<dyn Clock>,
    inner: Arc<Mutex<Inner>>,
    listeners: Arc<Mutex<Listeners>>,
}

impl AuthContext {
    /// Build the context and register it for `api`'s 401 expiry. One context
    /// per client; a later context takes the hook over.
    pub fn new(api: Arc<ApiClient>, clock: Arc<dyn Clock>) -> Self {
        let inner = Arc::new(Mutex::new(Inner { state: AuthState::Initializing, generation: 0, initialized: false }));
        let listeners = Arc::new(Mutex::new(Listeners::default()));

        let (hook_inner, hook_listeners) = (Arc::clone(&inner), Arc::clone(&listeners));
        api.on_session_expired(move || drop_expired_session(&hook_inner, &hook_listeners));

        Self { api, clock, inner, listeners }
    }

    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.lock().state.session().cloned()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading()
    }

    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.lock()
            .state
            .session()
            .is_some_and(|session| session.has_authority(authority))
    }

    /// Register `listener` to run after every state transition.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        listeners.next_id += 1;
        let id = SubscriptionId(listeners.next_id);
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry, _)| *entry != id);
        listeners.entries.len() != before
    }

    /// Resolve `Initializing` from the stored credential. Runs at most once;
    /// later calls return immediately. Failures are never surfaced: they all
    /// end in `Anonymous` with the store cleared.
    pub async fn initialize(&self) {
        let generation = {
            let mut inner = self.lock();
            if inner.initialized {
                return;
            }
            inner.initialized = true;
            inner.generation
        };

        let (next, clear_store) = self.restore().await;
        if !self.commit(generation, next, clear_store) {
            tracing::debug!("discarding stale session restore");
        }
    }

    async fn restore(&self) -> (AuthState, bool) {
        let Some(credential) = self.api.tokens().read() else {
            return (AuthState::Anonymous, false);
        };
        let claims = match claims::decode(&credential) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(error = %err, "stored credential is unreadable");
                return (AuthState::Anonymous, true);
            }
        };
        if claims.is_expired_at(self.clock.now()) {
            tracing::debug!(username = %claims.username, "stored credential has expired");
            return (AuthState::Anonymous, true);
        }
        match endpoints::fetch_profile(&self.api, &claims.username).await {
            Ok(profile) => (AuthState::Authenticated(Session::compose(claims, profile)), false),
            Err(err) => {
                tracing::warn!(username = %claims.username, error = %err, "profile fetch failed during restore");
                (AuthState::Anonymous, true)
            }
        }
    }

    /// Exchange a username/password pair for a session.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError`] when the backend rejects the credentials, answers
    /// without a usable credential, cannot be reached, the profile fetch fails,
    /// or a later `login`/`logout` supersedes this call. No session is
    /// published on error; a rejected login leaves the token store untouched.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        let generation = self.begin();
        let result = self.authenticate(generation, username, password).await;
        match &result {
            Ok(_) => tracing::info!(%username, "signed in"),
            Err(LoginError::Superseded) => tracing::debug!(%username, "sign-in superseded"),
            Err(err) => {
                tracing::info!(%username, error = %err, "sign-in failed");
                self.settle_failed_login(generation);
            }
        }
        result
    }

    async fn authenticate(&self, generation: u64, username: &str, password: &str) -> Result<Session, LoginError> {
        let options = RequestOptions::post_json(&LoginRequest { username, password })?.anonymous();
        let response = self.api.request(LOGIN_PATH, options).await.map_err(|err| match err {
            ApiError::Status { status, .. } => LoginError::Rejected { status },
            other => LoginError::Api(other),
        })?;

        let body: LoginResponse = response.json().map_err(|_| LoginError::Malformed)?;
        let credential = match body.jwt_token {
            Some(token) if body.status == LOGIN_STATUS_OK && !token.trim().is_empty() => token,
            _ => return Err(LoginError::Malformed),
        };
        let claims = claims::decode(&credential)?;
        if claims.is_expired_at(self.clock.now()) {
            return Err(LoginError::Expired);
        }

        // Persist before the profile fetch so it goes out authenticated.
        if self.if_current(generation, |_| self.api.store_credential(&credential)).is_none() {
            return Err(LoginError::Superseded);
        }

        match endpoints::fetch_profile(&self.api, &claims.username).await {
            Ok(profile) => {
                let session = Session::compose(claims, profile);
                if self.commit(generation, AuthState::Authenticated(session.clone()), false) {
                    Ok(session)
                } else {
                    Err(LoginError::Superseded)
                }
            }
            Err(err) => {
                self.commit(generation, AuthState::Anonymous, true);
                Err(err.into())
            }
        }
    }

    /// A failed login that superseded the startup restore must still leave
    /// `Initializing`, otherwise guards would spin forever. The superseded
    /// restore never got to discard a dead stored credential, so do it here.
    fn settle_failed_login(&self, generation: u64) {
        let settled = {
            let mut inner = self.lock();
            if inner.generation != generation || !inner.state.is_loading() {
                return;
            }
            if self.stored_credential_is_dead() {
                self.api.tokens().clear();
            }
            inner.state = AuthState::Anonymous;
            inner.state.clone()
        };
        self.notify(&settled);
    }

    /// Stored credential that could never be restored: undecodable or expired.
    fn stored_credential_is_dead(&self) -> bool {
        self.api.tokens().read().is_some_and(|credential| {
            claims::decode(&credential).map_or(true, |claims| claims.is_expired_at(self.clock.now()))
        })
    }

    /// Drop the session immediately and send the user to the login route.
    pub fn logout(&self) {
        let snapshot = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.initialized = true;
            self.api.tokens().clear();
            inner.state = AuthState::Anonymous;
            inner.state.clone()
        };
        tracing::info!("signed out");
        self.notify(&snapshot);
        self.api.navigator().navigate(LOGIN_ROUTE);
    }

    /// Log out if the current session's credential has expired. Returns
    /// whether a logout happened.
    pub fn check_expiry(&self) -> bool {
        let now = self.clock.now();
        let expired = self
            .lock()
            .state
            .session()
            .is_some_and(|session| session.is_expired_at(now));
        if expired {
            tracing::info!("session credential expired");
            self.logout();
        }
        expired
    }

    // -------------------------------------------------------------------------
    // internals
    // -------------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> u64 {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.generation
    }

    fn if_current<R>(&self, generation: u64, apply: impl FnOnce(&mut Inner) -> R) -> Option<R> {
        let mut inner = self.lock();
        (inner.generation == generation).then(|| apply(&mut inner))
    }

    /// Publish `next` if `generation` is still current. Returns whether it was applied.
    fn commit(&self, generation: u64, next: AuthState, clear_store: bool) -> bool {
        let applied = self.if_current(generation, |inner| {
            if clear_store {
                self.api.tokens().clear();
            }
            inner.state = next;
            inner.state.clone()
        });
        match applied {
            Some(snapshot) => {
                self.notify(&snapshot);
                true
            }
            None => false,
        }
    }

    fn notify(&self, state: &AuthState) {
        notify_listeners(&self.listeners, state);
    }
}

fn notify_listeners(listeners: &Mutex<Listeners>, state: &AuthState) {
    let listeners: Vec<Listener> = listeners
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .entries
        .iter()
        .map(|(_, listener)| Arc::clone(listener))
        .collect();
    for listener in listeners {
        listener(state);
    }
}

/// 401 hook: the API client already cleared the store and redirects after
/// this returns, so only the in-memory state changes here.
fn drop_expired_session(inner: &Mutex<Inner>, listeners: &Mutex<Listeners>) {
    let snapshot = {
        let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.state == AuthState::Anonymous {
            return;
        }
        inner.generation += 1;
        inner.initialized = true;
        inner.state = AuthState::Anonymous;
        inner.state.clone()
    };
    tracing::info!("session dropped after credential rejection");
    notify_listeners(listeners, &snapshot);
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
