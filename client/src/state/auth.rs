//! Reactive bridge from the shared auth state machine into Leptos.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AuthContext`] owns every transition. This module mirrors its state into
//! an `RwSignal` so guards and components re-render on login, logout and
//! startup restore without polling.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use leptos::prelude::*;
use registry::{AuthContext, AuthState, Session};

/// How often a mounted app re-checks credential expiry.
#[cfg(feature = "csr")]
const EXPIRY_CHECK_INTERVAL_MS: u32 = 60_000;

/// Handle provided through Leptos context.
#[derive(Clone)]
pub struct AuthHandle {
    pub context: Arc<AuthContext>,
    pub state: RwSignal<AuthState>,
}

impl AuthHandle {
    pub fn new(context: Arc<AuthContext>) -> Self {
        let state = RwSignal::new(context.state());
        context.subscribe(move |next| state.set(next.clone()));
        Self { context, state }
    }

    pub fn logout(&self) {
        self.context.logout();
    }
}

/// Create the handle and make it available to every descendant.
pub fn provide_auth(context: Arc<AuthContext>) -> AuthHandle {
    let handle = AuthHandle::new(context);
    provide_context(handle.clone());
    handle
}

pub fn use_auth() -> AuthHandle {
    expect_context::<AuthHandle>()
}

/// Restore the stored session and keep checking for expiry while the page
/// stays open.
#[cfg(feature = "csr")]
pub fn start_session(context: Arc<AuthContext>) {
    let restore = context.clone();
    leptos::task::spawn_local(async move {
        restore.initialize().await;
    });
    gloo_timers::callback::Interval::new(EXPIRY_CHECK_INTERVAL_MS, move || {
        context.check_expiry();
    })
    .forget();
}

/// Short label for the header: display name plus authorities.
pub fn session_label(session: &Session) -> String {
    if session.authorities.is_empty() {
        session.display_name().to_owned()
    } else {
        format!("{} ({})", session.display_name(), session.authorities.join(", "))
    }
}
