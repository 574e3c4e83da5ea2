//! Student roster for one exam year: ranked, searchable and paged, with
//! registration of new students and removal of existing ones.

#[cfg(test)]
#[path = "students_test.rs"]
mod students_test;

use leptos::prelude::*;
use registry::clock::{Clock, SystemClock};
use registry::endpoints::{self, StudentQuery};
use registry::lookup::load_cities;
use registry::types::{RegisterStudentRequest, StudentPage, default_exam_year};

use crate::state::auth::use_auth;

/// Exam years offered in year pickers, newest first.
const YEAR_CHOICES: i32 = 5;
const MISSING_STUDENT_FIELDS: &str = "Enter the student's name, national ID and city.";

pub(crate) fn year_options(current: i32) -> Vec<i32> {
    (0..YEAR_CHOICES).map(|back| current - back).collect()
}

pub(crate) fn student_path(code: i64) -> String {
    format!("/students/{code}")
}

fn registration(name: &str, national_id: &str, city: &str) -> Result<RegisterStudentRequest, &'static str> {
    let (name, national_id, city) = (name.trim(), national_id.trim(), city.trim());
    if name.is_empty() || national_id.is_empty() || city.is_empty() {
        return Err(MISSING_STUDENT_FIELDS);
    }
    Ok(RegisterStudentRequest { name: name.to_owned(), national_id: national_id.to_owned(), city: city.to_owned() })
}

fn page_summary(page: &StudentPage) -> String {
    if page.total_elements == 0 {
        return "No students found.".to_owned();
    }
    format!("Page {} of {} ({} students)", page.number + 1, page.total_pages.max(1), page.total_elements)
}

fn next_page(page: &StudentPage) -> Option<u32> {
    (page.number + 1 < page.total_pages).then_some(page.number + 1)
}

fn previous_page(page: &StudentPage) -> Option<u32> {
    page.number.checked_sub(1)
}

/// CSS modifier for a result badge.
fn result_band(result: f64) -> &'static str {
    if result >= 95.0 {
        "excellent"
    } else if result >= 85.0 {
        "very-good"
    } else if result >= 75.0 {
        "good"
    } else {
        "pass"
    }
}

#[component]
pub fn StudentsPage() -> impl IntoView {
    let auth = use_auth();
    let api = auth.context.api().clone();
    let current_year = default_exam_year(SystemClock.now());
    let query = RwSignal::new(StudentQuery::new(current_year));
    let search = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());

    let name = RwSignal::new(String::new());
    let national_id = RwSignal::new(String::new());
    let city = RwSignal::new(String::new());

    let students = {
        let api = api.clone();
        LocalResource::new(move || {
            let api = api.clone();
            let query = query.get();
            async move { endpoints::list_students(&api, &query).await }
        })
    };
    let cities = {
        let api = api.clone();
        LocalResource::new(move || {
            let api = api.clone();
            async move { load_cities(&api).await }
        })
    };

    let on_search = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let term = search.get();
        query.update(|query| {
            query.search = Some(term).filter(|term| !term.trim().is_empty());
            query.page = 0;
        });
    };

    let on_year = move |ev: leptos::ev::Event| {
        if let Ok(year) = event_target_value(&ev).parse::<i32>() {
            query.update(|query| {
                query.year = year;
                query.page = 0;
            });
        }
    };

    let on_register = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let request = match registration(&name.get(), &national_id.get(), &city.get()) {
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
                    match endpoints::register_student(&api, &request).await {
                        Ok(()) => {
                            info.set(format!("Registered {}.", request.name));
                            name.set(String::new());
                            national_id.set(String::new());
                            city.set(String::new());
                            students.refetch();
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

    let on_delete = move |code: i64| {
        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match endpoints::delete_student(&api, code).await {
                    Ok(_) => {
                        info.set(format!("Deleted student {code}."));
                        students.refetch();
                    }
                    Err(error) => info.set(error.to_string()),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&api, code);
        }
    };

    view! {
        <div class="students-page">
            <h1>"Students"</h1>
            <form class="students-page__search" on:submit=on_search>
                <select on:change=on_year>
                    {year_options(current_year)
                        .into_iter()
                        .map(|year| view! { <option value=year.to_string()>{year.to_string()}</option> })
                        .collect::<Vec<_>>()}
                </select>
                <input
                    type="search"
                    placeholder="Name or code"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />
                <button class="btn" type="submit">"Search"</button>
            </form>
            <Show when=move || !info.get().is_empty()>
                <p class="students-page__message">{move || info.get()}</p>
            </Show>
            <Suspense fallback=move || view! { <p>"Loading students..."</p> }>
                {move || {
                    let on_delete = on_delete.clone();
                    students
                        .get()
                        .map(move |result| match result {
                            Ok(page) => {
                                let previous = previous_page(&page);
                                let next = next_page(&page);
                                let summary = page_summary(&page);
                                view! {
                                    <table class="students-page__table">
                                        <thead>
                                            <tr>
                                                <th>"Code"</th>
                                                <th>"Name"</th>
                                                <th>"Level"</th>
                                                <th>"City"</th>
                                                <th>"Result"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {page
                                                .content
                                                .into_iter()
                                                .map(|student| {
                                                    let on_delete = on_delete.clone();
                                                    let code = student.code;
                                                    let badge = format!("badge badge--{}", result_band(student.result));
                                                    view! {
                                                        <tr>
                                                            <td>
                                                                <a href=student_path(code)>{code.to_string()}</a>
                                                            </td>
                                                            <td>{student.name}</td>
                                                            <td>{student.level}</td>
                                                            <td>{student.city}</td>
                                                            <td>
                                                                <span class=badge>{student.result.to_string()}</span>
                                                            </td>
                                                            <td>
                                                                <button
                                                                    class="btn btn--danger"
                                                                    on:click=move |_| on_delete(code)
                                                                >
                                                                    "Delete"
                                                                </button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect::<Vec<_>>()}
                                        </tbody>
                                    </table>
                                    <div class="students-page__pager">
                                        <button
                                            class="btn"
                                            disabled=previous.is_none()
                                            on:click=move |_| {
                                                if let Some(page) = previous {
                                                    query.update(|query| query.page = page);
                                                }
                                            }
                                        >
                                            "Previous"
                                        </button>
                                        <span>{summary}</span>
                                        <button
                                            class="btn"
                                            disabled=next.is_none()
                                            on:click=move |_| {
                                                if let Some(page) = next {
                                                    query.update(|query| query.page = page);
                                                }
                                            }
                                        >
                                            "Next"
                                        </button>
                                    </div>
                                }
                                    .into_any()
                            }
                            Err(error) => {
                                view! { <p class="students-page__error">{error.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
            <form class="students-page__register" on:submit=on_register>
                <h2>"Register a student"</h2>
                <input
                    type="text"
                    placeholder="Full name"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="National ID"
                    prop:value=move || national_id.get()
                    on:input=move |ev| national_id.set(event_target_value(&ev))
                />
                <Suspense fallback=move || view! { <select disabled=true></select> }>
                    {move || {
                        cities
                            .get()
                            .map(|lookup| {
                                let error = lookup.error.clone();
                                view! {
                                    <select
                                        prop:value=move || city.get()
                                        on:change=move |ev| city.set(event_target_value(&ev))
                                    >
                                        <option value="">"City"</option>
                                        {lookup
                                            .items
                                            .into_iter()
                                            .map(|item| view! { <option value=item.name.clone()>{item.name.clone()}</option> })
                                            .collect::<Vec<_>>()}
                                    </select>
                                    {error.map(|error| view! { <p class="students-page__error">{error}</p> })}
                                }
                            })
                    }}
                </Suspense>
                <button class="btn btn--primary" type="submit">"Register"</button>
            </form>
        </div>
    }
}
