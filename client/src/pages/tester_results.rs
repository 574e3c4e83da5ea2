//! Result review for testers: look a student's result up by code and year,
//! and grade it while it is still ungraded.

#[cfg(test)]
#[path = "tester_results_test.rs"]
mod tester_results_test;

use leptos::prelude::*;
use registry::clock::{Clock, SystemClock};
use registry::types::{StudentResult, UpdateResultRequest, default_exam_year};

use crate::state::auth::use_auth;

const MISSING_LOOKUP: &str = "Enter a student code and a year.";
const INVALID_RESULT: &str = "Enter a whole, non-negative result.";
const LOCKED_RESULT: &str = "This result is already graded and cannot be changed.";

fn parse_lookup(code: &str, year: &str) -> Result<(i64, i32), &'static str> {
    let code = code.trim().parse::<i64>().map_err(|_| MISSING_LOOKUP)?;
    let year = year.trim().parse::<i32>().map_err(|_| MISSING_LOOKUP)?;
    Ok((code, year))
}

/// The grade to submit for `current`, or why it cannot be submitted.
fn grade_update(current: &StudentResult, raw: &str) -> Result<UpdateResultRequest, &'static str> {
    if current.is_locked() {
        return Err(LOCKED_RESULT);
    }
    let value = raw.trim().parse::<u32>().map_err(|_| INVALID_RESULT)?;
    Ok(UpdateResultRequest { code: current.code, year: current.year, result: f64::from(value) })
}

#[component]
pub fn TesterResultsPage() -> impl IntoView {
    let auth = use_auth();
    let api = auth.context.api().clone();
    let code = RwSignal::new(String::new());
    let year = RwSignal::new(default_exam_year(SystemClock.now()).to_string());
    let grade = RwSignal::new(String::new());
    let found = RwSignal::new(None::<StudentResult>);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_search = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            found.set(None);
            grade.set(String::new());
            let (code_value, year_value) = match parse_lookup(&code.get(), &year.get()) {
                Ok(lookup) => lookup,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
            busy.set(true);
            info.set(String::new());

            #[cfg(feature = "csr")]
            {
                let api = api.clone();
                leptos::task::spawn_local(async move {
                    match registry::endpoints::fetch_student_result(&api, code_value, year_value).await {
                        Ok(result) => {
                            grade.set(result.result.to_string());
                            found.set(Some(result));
                        }
                        Err(error) => info.set(error.to_string()),
                    }
                    busy.set(false);
                });
            }
            #[cfg(not(feature = "csr"))]
            {
                let _ = (&api, code_value, year_value);
                busy.set(false);
            }
        }
    };

    let on_save = move |_| {
        let Some(current) = found.get() else {
            return;
        };
        let request = match grade_update(&current, &grade.get()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match registry::endpoints::update_student_result(&api, &request).await {
                    Ok(()) => {
                        info.set("Result saved.".to_owned());
                        found.set(Some(StudentResult { result: request.result, ..current }));
                    }
                    Err(error) => info.set(error.to_string()),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&api, current, request);
            busy.set(false);
        }
    };

    let locked = move || found.with(|found| found.as_ref().is_some_and(StudentResult::is_locked));

    view! {
        <div class="tester-page">
            <h1>"Results"</h1>
            <form class="tester-page__search" on:submit=on_search>
                <input
                    type="text"
                    inputmode="numeric"
                    placeholder="Student code"
                    prop:value=move || code.get()
                    on:input=move |ev| code.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    inputmode="numeric"
                    placeholder="Year"
                    prop:value=move || year.get()
                    on:input=move |ev| year.set(event_target_value(&ev))
                />
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    "Search"
                </button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="tester-page__message">{move || info.get()}</p>
            </Show>
            {move || {
                found
                    .get()
                    .map(|result| {
                        view! {
                            <dl class="tester-page__result">
                                <dt>"Name"</dt>
                                <dd>{result.name}</dd>
                                <dt>"Code"</dt>
                                <dd>{result.code.to_string()}</dd>
                                <dt>"Level"</dt>
                                <dd>{result.level}</dd>
                                <dt>"City"</dt>
                                <dd>{result.city}</dd>
                            </dl>
                        }
                    })
            }}
            <Show when=move || found.with(Option::is_some)>
                <div class="tester-page__grade">
                    <input
                        type="text"
                        inputmode="numeric"
                        prop:value=move || grade.get()
                        disabled=locked
                        on:input=move |ev| grade.set(event_target_value(&ev))
                    />
                    <button class="btn btn--primary" disabled=move || busy.get() || locked() on:click=on_save.clone()>
                        "Save"
                    </button>
                    <Show when=locked>
                        <p class="tester-page__locked">{LOCKED_RESULT}</p>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
