//! Route gating as a pure function of auth state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Front-ends wrap protected views in a guard that calls [`evaluate`] on every
//! auth transition and either shows a neutral loading state, redirects, or
//! renders. The guard holds no state of its own.

use crate::auth::AuthState;
use crate::types::Role;

/// Login entry point. Anonymous users and expired sessions land here.
pub const LOGIN_ROUTE: &str = "/login";

/// Where authenticated users without the required authority are sent.
pub const LANDING_ROUTE: &str = "/dashboard";

/// Who may see a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Rendered regardless of auth state.
    Public,
    /// Any authenticated session.
    Session,
    /// Authenticated session holding this authority.
    Authority(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth is still initializing; render a neutral placeholder, never redirect.
    Loading,
    Redirect(&'static str),
    Render,
}

#[must_use]
pub fn evaluate(state: &AuthState, access: Access) -> GuardDecision {
    if access == Access::Public {
        return GuardDecision::Render;
    }
    match state {
        AuthState::Initializing => GuardDecision::Loading,
        AuthState::Anonymous => GuardDecision::Redirect(LOGIN_ROUTE),
        AuthState::Authenticated(session) => match access {
            Access::Authority(required) if !session.has_authority(required) => GuardDecision::Redirect(LANDING_ROUTE),
            _ => GuardDecision::Render,
        },
    }
}

/// Access requirement for an application path. Unknown paths require a session.
#[must_use]
pub fn route_access(path: &str) -> Access {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let first = path.trim_matches('/').split('/').next().unwrap_or_default();
    match first {
        "login" | "public-results" => Access::Public,
        "users" => Access::Authority(Role::Admin.as_str()),
        "tester-results" => Access::Authority(Role::Tester.as_str()),
        _ => Access::Session,
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
