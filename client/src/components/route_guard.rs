//! Gate for protected routes.
//!
//! The decision is a pure function of auth state and the current path
//! ([`evaluate`] over [`route_access`]). While the stored session is being
//! restored the guard renders a neutral placeholder and never redirects, so a
//! valid session is not bounced to the login page on reload.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};
use registry::GuardDecision;
use registry::guard::{evaluate, route_access};

use crate::state::auth::use_auth;

#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let state = auth.state;
    let location = use_location();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| {
        let path = location.pathname.get();
        state.with(|state| evaluate(state, route_access(&path)))
    });

    // Route changes are a natural point to drop a session whose credential
    // ran out while the page sat idle.
    let context = auth.context;
    Effect::new(move || {
        location.pathname.track();
        context.check_expiry();
    });

    Effect::new(move || {
        if let GuardDecision::Redirect(target) = decision.get() {
            navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    move || match decision.get() {
        GuardDecision::Render => children().into_any(),
        GuardDecision::Loading | GuardDecision::Redirect(_) => {
            view! { <div class="route-guard route-guard--loading">"Loading..."</div> }.into_any()
        }
    }
}
