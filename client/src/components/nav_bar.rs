//! Top navigation: links the session may open, current user and sign out.

#[cfg(test)]
#[path = "nav_bar_test.rs"]
mod nav_bar_test;

use leptos::prelude::*;
use registry::Session;
use registry::guard::{Access, LANDING_ROUTE, route_access};

use crate::state::auth::{session_label, use_auth};

/// `(label, path)` for every page in the header.
const NAV_ENTRIES: &[(&str, &str)] = &[
    ("Dashboard", LANDING_ROUTE),
    ("Students", "/students"),
    ("Results", "/tester-results"),
    ("Users", "/users"),
];

/// Entries whose route the session is allowed to open.
pub fn nav_links(session: &Session) -> Vec<(&'static str, &'static str)> {
    NAV_ENTRIES
        .iter()
        .copied()
        .filter(|(_, path)| match route_access(path) {
            Access::Public | Access::Session => true,
            Access::Authority(required) => session.has_authority(required),
        })
        .collect()
}

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let state = auth.state;
    let session = move || state.with(|state| state.session().cloned());
    let on_logout = move |_| auth.logout();

    view! {
        <Show when=move || session().is_some()>
            <nav class="nav-bar">
                <ul class="nav-bar__links">
                    {move || {
                        session()
                            .map(|session| {
                                nav_links(&session)
                                    .into_iter()
                                    .map(|(label, path)| view! { <li><a href=path>{label}</a></li> })
                                    .collect::<Vec<_>>()
                            })
                            .unwrap_or_default()
                    }}
                </ul>
                <span class="nav-bar__user">
                    {move || session().map(|session| session_label(&session)).unwrap_or_default()}
                </span>
                <button class="btn nav-bar__logout" on:click=on_logout.clone()>
                    "Sign out"
                </button>
            </nav>
        </Show>
    }
}
