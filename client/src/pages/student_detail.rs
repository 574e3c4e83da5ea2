//! One student: details, exam history, edits, exam registration and a
//! printable certificate view.

#[cfg(test)]
#[path = "student_detail_test.rs"]
mod student_detail_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};
use registry::clock::{Clock, SystemClock};
use registry::endpoints;
use registry::lookup::{load_cities, load_levels};
use registry::types::{
    ExamHistoryEntry, RegisterExamRequest, StudentDetails, UpdateStudentRequest, default_exam_year,
};
use registry::{ApiClient, ApiError};

use super::students::student_path;
use crate::net::browser::print_page;
use crate::state::auth::use_auth;

const INVALID_CODE: &str = "Invalid student code.";
const MISSING_LEVEL: &str = "Choose a level to register for.";
const MISSING_DETAILS: &str = "Name, national ID and city are required.";

#[derive(Clone, Debug, PartialEq)]
struct StudentRecord {
    details: StudentDetails,
    history: Vec<ExamHistoryEntry>,
}

fn parse_code(raw: Option<String>) -> Result<i64, &'static str> {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|code| *code > 0)
        .ok_or(INVALID_CODE)
}

fn print_path(code: i64) -> String {
    format!("{}/print", student_path(code))
}

async fn load_record(api: &ApiClient, code: i64) -> Result<StudentRecord, ApiError> {
    let details = endpoints::fetch_student(api, code).await?;
    let history = endpoints::fetch_exam_history(api, code).await?;
    Ok(StudentRecord { details, history })
}

fn exam_registration(code: i64, level: &str, year: i32) -> Result<RegisterExamRequest, &'static str> {
    let level = level.trim();
    if level.is_empty() {
        return Err(MISSING_LEVEL);
    }
    Ok(RegisterExamRequest::new(code, level, year))
}

fn student_update(code: i64, name: &str, national_id: &str, city: &str) -> Result<UpdateStudentRequest, &'static str> {
    let (name, national_id, city) = (name.trim(), national_id.trim(), city.trim());
    if name.is_empty() || national_id.is_empty() || city.is_empty() {
        return Err(MISSING_DETAILS);
    }
    Ok(UpdateStudentRequest {
        code,
        name: name.to_owned(),
        national_id: national_id.to_owned(),
        city: city.to_owned(),
    })
}

/// Record for the `:code` route parameter, or a displayable error.
fn record_resource(api: std::sync::Arc<ApiClient>) -> (Memo<Result<i64, &'static str>>, LocalResource<Result<StudentRecord, String>>) {
    let params = use_params_map();
    let code = Memo::new(move |_| parse_code(params.read().get("code")));
    let record = LocalResource::new(move || {
        let api = api.clone();
        let code = code.get();
        async move {
            match code {
                Ok(code) => load_record(&api, code).await.map_err(|error| error.to_string()),
                Err(message) => Err(message.to_owned()),
            }
        }
    });
    (code, record)
}

fn history_table(history: Vec<ExamHistoryEntry>) -> impl IntoView {
    view! {
        <table class="student-page__history">
            <thead>
                <tr>
                    <th>"Year"</th>
                    <th>"Level"</th>
                    <th>"Result"</th>
                </tr>
            </thead>
            <tbody>
                {history
                    .into_iter()
                    .map(|entry| {
                        view! {
                            <tr>
                                <td>{entry.year.to_string()}</td>
                                <td>{entry.level}</td>
                                <td>{entry.result.to_string()}</td>
                            </tr>
                        }
                    })
                    .collect::<Vec<_>>()}
            </tbody>
        </table>
    }
}

#[component]
pub fn StudentDetailPage() -> impl IntoView {
    let auth = use_auth();
    let api = auth.context.api().clone();
    let navigate = use_navigate();
    let (code, record) = record_resource(api.clone());
    let info = RwSignal::new(String::new());

    let name = RwSignal::new(String::new());
    let national_id = RwSignal::new(String::new());
    let city = RwSignal::new(String::new());
    let level = RwSignal::new(String::new());

    let levels = {
        let api = api.clone();
        LocalResource::new(move || {
            let api = api.clone();
            async move { load_levels(&api).await }
        })
    };
    let cities = {
        let api = api.clone();
        LocalResource::new(move || {
            let api = api.clone();
            async move { load_cities(&api).await }
        })
    };

    Effect::new(move || {
        if let Some(Ok(loaded)) = record.get() {
            name.set(loaded.details.name);
            national_id.set(loaded.details.national_id);
            city.set(loaded.details.city);
        }
    });

    let on_update = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let Ok(code) = code.get() else {
                return;
            };
            let request = match student_update(code, &name.get(), &national_id.get(), &city.get()) {
                Ok(request) => request,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };

            #[cfg(feature = "csr")]
            {
                let api = api.clone();
                leptos::task::spawn_local(async move {
                    match endpoints::update_student(&api, &request).await {
                        Ok(()) => {
                            info.set("Details saved.".to_owned());
                            record.refetch();
                        }
                        Err(error) => info.set(error.to_string()),
                    }
                });
            }
            #[cfg(not(feature = "csr"))]
            {
                let _ = (&api, request);
            }
        }
    };

    let on_register = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let Ok(code) = code.get() else {
                return;
            };
            let year = default_exam_year(SystemClock.now());
            let request = match exam_registration(code, &level.get(), year) {
                Ok(request) => request,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };

            #[cfg(feature = "csr")]
            {
                let api = api.clone();
                leptos::task::spawn_local(async move {
                    match endpoints::register_exam(&api, &request).await {
                        Ok(()) => {
                            info.set(format!("Registered for {} in {}.", request.level, request.year));
                            level.set(String::new());
                            record.refetch();
                        }
                        Err(error) => info.set(error.to_string()),
                    }
                });
            }
            #[cfg(not(feature = "csr"))]
            {
                let _ = (&api, request);
            }
        }
    };

    let on_delete = move |_| {
        let Ok(code) = code.get() else {
            return;
        };

        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match endpoints::delete_student(&api, code).await {
                    Ok(_) => navigate("/students", leptos_router::NavigateOptions::default()),
                    Err(error) => info.set(error.to_string()),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&api, &navigate, code);
        }
    };

    view! {
        <div class="student-page">
            <a class="student-page__back" href="/students">"All students"</a>
            <Show when=move || !info.get().is_empty()>
                <p class="student-page__message">{move || info.get()}</p>
            </Show>
            <Suspense fallback=move || view! { <p>"Loading student..."</p> }>
                {move || {
                    record
                        .get()
                        .map(|result| match result {
                            Ok(loaded) => {
                                let code = loaded.details.code;
                                view! {
                                    <header class="student-page__header">
                                        <h1>{loaded.details.name}</h1>
                                        <a class="btn" href=print_path(code)>"Print"</a>
                                    </header>
                                    <dl class="student-page__details">
                                        <dt>"Code"</dt>
                                        <dd>{code.to_string()}</dd>
                                        <dt>"National ID"</dt>
                                        <dd>{loaded.details.national_id}</dd>
                                        <dt>"City"</dt>
                                        <dd>{loaded.details.city}</dd>
                                    </dl>
                                    {history_table(loaded.history)}
                                }
                                    .into_any()
                            }
                            Err(error) => view! { <p class="student-page__error">{error}</p> }.into_any(),
                        })
                }}
            </Suspense>
            <form class="student-page__edit" on:submit=on_update>
                <h2>"Edit details"</h2>
                <input
                    type="text"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    prop:value=move || national_id.get()
                    on:input=move |ev| national_id.set(event_target_value(&ev))
                />
                <Suspense fallback=move || view! { <select disabled=true></select> }>
                    {move || {
                        cities
                            .get()
                            .map(|lookup| {
                                view! {
                                    <select
                                        prop:value=move || city.get()
                                        on:change=move |ev| city.set(event_target_value(&ev))
                                    >
                                        {lookup
                                            .items
                                            .into_iter()
                                            .map(|item| view! { <option value=item.name.clone()>{item.name.clone()}</option> })
                                            .collect::<Vec<_>>()}
                                    </select>
                                    {lookup.error.map(|error| view! { <p class="student-page__error">{error}</p> })}
                                }
                            })
                    }}
                </Suspense>
                <button class="btn btn--primary" type="submit">"Save"</button>
            </form>
            <form class="student-page__exam" on:submit=on_register>
                <h2>"Register for an exam"</h2>
                <Suspense fallback=move || view! { <select disabled=true></select> }>
                    {move || {
                        levels
                            .get()
                            .map(|lookup| {
                                view! {
                                    <select
                                        prop:value=move || level.get()
                                        on:change=move |ev| level.set(event_target_value(&ev))
                                    >
                                        <option value="">"Level"</option>
                                        {lookup
                                            .items
                                            .into_iter()
                                            .map(|item| view! { <option value=item.name.clone()>{item.name.clone()}</option> })
                                            .collect::<Vec<_>>()}
                                    </select>
                                    {lookup.error.map(|error| view! { <p class="student-page__error">{error}</p> })}
                                }
                            })
                    }}
                </Suspense>
                <button class="btn btn--primary" type="submit">"Register"</button>
            </form>
            <button class="btn btn--danger" on:click=on_delete>"Delete student"</button>
        </div>
    }
}

/// Certificate layout: the student's details and their first exam entry.
#[component]
pub fn StudentPrintPage() -> impl IntoView {
    let auth = use_auth();
    let (code, record) = record_resource(auth.context.api().clone());
    let back = move || code.get().map(student_path).unwrap_or_else(|_| "/students".to_owned());

    view! {
        <div class="print-page">
            <nav class="print-page__actions">
                <a class="btn" href=back>"Back"</a>
                <button class="btn btn--primary" on:click=move |_| print_page()>"Print"</button>
            </nav>
            <Suspense fallback=move || view! { <p>"Loading..."</p> }>
                {move || {
                    record
                        .get()
                        .map(|result| match result {
                            Ok(loaded) => {
                                let exam = loaded.history.into_iter().next();
                                view! {
                                    <article class="print-page__certificate">
                                        <h1>{loaded.details.name}</h1>
                                        <p>"Code: " {loaded.details.code.to_string()}</p>
                                        <p>"National ID: " {loaded.details.national_id}</p>
                                        <p>"City: " {loaded.details.city}</p>
                                        {match exam {
                                            Some(exam) => {
                                                view! {
                                                    <p>
                                                        {format!(
                                                            "{}: {} ({})",
                                                            exam.year,
                                                            exam.level,
                                                            exam.result,
                                                        )}
                                                    </p>
                                                }
                                                    .into_any()
                                            }
                                            None => view! { <p>"No exam on record."</p> }.into_any(),
                                        }}
                                    </article>
                                }
                                    .into_any()
                            }
                            Err(error) => view! { <p class="print-page__error">{error}</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}
