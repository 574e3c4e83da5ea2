//! Username/password sign-in.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use registry::LoginError;
use registry::guard::LANDING_ROUTE;

use crate::state::auth::use_auth;

const MISSING_FIELDS: &str = "Enter both username and password.";

/// Trimmed username and untouched password, or the message to show.
fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok((username.to_owned(), password.to_owned()))
}

fn login_error_message(error: &LoginError) -> String {
    match error {
        LoginError::Rejected { .. } => "Invalid username or password.".to_owned(),
        LoginError::Malformed | LoginError::Decode(_) => "The server returned an unusable sign-in token.".to_owned(),
        LoginError::Expired => "The server returned an expired sign-in token.".to_owned(),
        LoginError::Api(api) => api.to_string(),
        LoginError::Superseded => "Sign-in was cancelled.".to_owned(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let state = auth.state;
    let navigate = use_navigate();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Signed in already, or just now: leave the login page.
    Effect::new(move || {
        if state.with(|state| state.session().is_some()) {
            navigate(LANDING_ROUTE, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let context = auth.context;
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (user, pass) = match validate_login_input(&username.get(), &password.get()) {
            Ok(fields) => fields,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set(String::new());

        #[cfg(feature = "csr")]
        {
            let context = context.clone();
            leptos::task::spawn_local(async move {
                if let Err(error) = context.login(&user, &pass).await {
                    log::info!("sign in failed: {error}");
                    info.set(login_error_message(&error));
                    password.set(String::new());
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&context, user, pass);
            busy.set(false);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Student Registry"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
