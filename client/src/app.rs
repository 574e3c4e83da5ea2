//! Root application component with routing and context providers.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{ParamSegment, StaticSegment};
use leptos_router::components::{Redirect, Route, Router, Routes};
use registry::clock::SystemClock;
use registry::config::{API_BASE_URL_ENV, RECAPTCHA_SITE_KEY_ENV};
use registry::guard::LANDING_ROUTE;
use registry::{ApiClient, AuthContext, RegistryConfig};

use crate::components::nav_bar::NavBar;
use crate::components::route_guard::RouteGuard;
use crate::net::browser::{GlooTransport, LocalStorageTokenStore, LocationNavigator};
use crate::pages::{
    dashboard::DashboardPage,
    login::LoginPage,
    public_results::PublicResultsPage,
    student_detail::{StudentDetailPage, StudentPrintPage},
    students::StudentsPage,
    tester_results::TesterResultsPage,
    users::UsersPage,
};
use crate::state::auth::provide_auth;

/// Configuration baked in at build time.
fn build_env(key: &str) -> Option<String> {
    match key {
        API_BASE_URL_ENV => option_env!("REGISTRY_API_BASE_URL").map(str::to_owned),
        RECAPTCHA_SITE_KEY_ENV => option_env!("REGISTRY_RECAPTCHA_SITE_KEY").map(str::to_owned),
        _ => None,
    }
}

fn client_config() -> RegistryConfig {
    match RegistryConfig::from_lookup(build_env) {
        Ok(config) => config,
        Err(_error) => {
            #[cfg(feature = "csr")]
            log::warn!("invalid build-time configuration, using defaults: {_error}");
            RegistryConfig::default()
        }
    }
}

/// Root application component.
///
/// Builds the single auth context for this page load, starts the stored
/// session restore and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = client_config();
    let api = ApiClient::new(
        &config,
        Arc::new(GlooTransport),
        Arc::new(LocalStorageTokenStore),
        Arc::new(LocationNavigator),
    );
    let context = Arc::new(AuthContext::new(Arc::new(api), Arc::new(SystemClock)));
    provide_auth(context.clone());
    provide_context(config);

    #[cfg(feature = "csr")]
    crate::state::auth::start_session(context);
    #[cfg(not(feature = "csr"))]
    let _ = context;

    view! {
        <Title text="Student Registry"/>

        <Router>
            <NavBar/>
            <main>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("public-results") view=PublicResultsPage/>
                    <Route
                        path=StaticSegment("dashboard")
                        view=|| view! { <RouteGuard><DashboardPage/></RouteGuard> }
                    />
                    <Route
                        path=StaticSegment("students")
                        view=|| view! { <RouteGuard><StudentsPage/></RouteGuard> }
                    />
                    <Route
                        path=(StaticSegment("students"), ParamSegment("code"))
                        view=|| view! { <RouteGuard><StudentDetailPage/></RouteGuard> }
                    />
                    <Route
                        path=(StaticSegment("students"), ParamSegment("code"), StaticSegment("print"))
                        view=|| view! { <RouteGuard><StudentPrintPage/></RouteGuard> }
                    />
                    <Route
                        path=StaticSegment("users")
                        view=|| view! { <RouteGuard><UsersPage/></RouteGuard> }
                    />
                    <Route
                        path=StaticSegment("tester-results")
                        view=|| view! { <RouteGuard><TesterResultsPage/></RouteGuard> }
                    />
                    <Route path=StaticSegment("") view=|| view! { <Redirect path=LANDING_ROUTE/> }/>
                </Routes>
            </main>
        </Router>
    }
}
