//! Anonymous result lookup by student code and exam year, guarded by a
//! reCAPTCHA token.

#[cfg(test)]
#[path = "public_results_test.rs"]
mod public_results_test;

use leptos::prelude::*;
use registry::clock::{Clock, SystemClock};
use registry::endpoints;
use registry::types::{PublicResult, default_exam_year};
use registry::{ApiClient, ApiError, RegistryConfig};

use super::students::year_options;
use crate::net::browser::recaptcha_token;
use crate::state::auth::use_auth;

const MISSING_CODE: &str = "Enter your student code.";
const INVALID_YEAR: &str = "Choose an exam year.";
const NO_RESULT: &str = "No result has been published for this code and year.";

fn validate_public_lookup(code: &str, year: &str) -> Result<(String, i32), &'static str> {
    let code = code.trim();
    if code.is_empty() {
        return Err(MISSING_CODE);
    }
    let year = year.trim().parse::<i32>().map_err(|_| INVALID_YEAR)?;
    Ok((code.to_owned(), year))
}

fn settle(outcome: Result<Option<PublicResult>, ApiError>) -> Result<PublicResult, String> {
    outcome.map_err(|error| error.to_string())?.ok_or_else(|| NO_RESULT.to_owned())
}

async fn lookup_result(api: &ApiClient, site_key: &str, code: &str, year: i32) -> Result<PublicResult, String> {
    let token = recaptcha_token(site_key).await.map_err(str::to_owned)?;
    settle(endpoints::fetch_public_result(api, code, year, &token).await)
}

#[component]
pub fn PublicResultsPage() -> impl IntoView {
    let auth = use_auth();
    let api = auth.context.api().clone();
    let site_key = use_context::<RegistryConfig>().unwrap_or_default().recaptcha_site_key;
    let current_year = default_exam_year(SystemClock.now());

    let code = RwSignal::new(String::new());
    let year = RwSignal::new(current_year.to_string());
    let found = RwSignal::new(None::<PublicResult>);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        found.set(None);
        let (code_value, year_value) = match validate_public_lookup(&code.get(), &year.get()) {
            Ok(lookup) => lookup,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set(String::new());

        let api = api.clone();
        let site_key = site_key.clone();
        leptos::task::spawn_local(async move {
            match lookup_result(&api, &site_key, &code_value, year_value).await {
                Ok(result) => found.set(Some(result)),
                Err(message) => info.set(message),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="public-results">
            <h1>"Exam results"</h1>
            <form class="public-results__form" on:submit=on_search>
                <input
                    type="text"
                    placeholder="Student code"
                    prop:value=move || code.get()
                    on:input=move |ev| code.set(event_target_value(&ev))
                />
                <select prop:value=move || year.get() on:change=move |ev| year.set(event_target_value(&ev))>
                    {year_options(current_year)
                        .into_iter()
                        .map(|option| view! { <option value=option.to_string()>{option.to_string()}</option> })
                        .collect::<Vec<_>>()}
                </select>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Searching..." } else { "Show result" }}
                </button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="public-results__message">{move || info.get()}</p>
            </Show>
            {move || {
                found
                    .get()
                    .map(|result| {
                        view! {
                            <dl class="public-results__card">
                                <dt>"Name"</dt>
                                <dd>{result.name}</dd>
                                <dt>"Code"</dt>
                                <dd>{result.code.to_string()}</dd>
                                <dt>"Level"</dt>
                                <dd>{result.level}</dd>
                                <dt>"City"</dt>
                                <dd>{result.city}</dd>
                                <dt>"Year"</dt>
                                <dd>{result.year.to_string()}</dd>
                                <dt>"Result"</dt>
                                <dd>{result.result.to_string()}</dd>
                            </dl>
                        }
                    })
            }}
        </div>
    }
}
