//! Landing page: registration totals for the current exam year.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use registry::clock::{Clock, SystemClock};
use registry::endpoints;
use registry::types::{LevelStudentCount, default_exam_year};
use registry::{ApiClient, ApiError};

use crate::state::auth::use_auth;

#[derive(Clone, Debug, PartialEq)]
struct Summary {
    year: i32,
    total: u64,
    in_year: u64,
    by_level: Vec<LevelStudentCount>,
}

async fn load_summary(api: &ApiClient, year: i32) -> Result<Summary, ApiError> {
    let total = endpoints::count_students(api).await?;
    let in_year = endpoints::count_students_in_year(api, year).await?;
    let by_level = endpoints::count_students_by_level(api, year).await?;
    Ok(Summary { year, total, in_year, by_level })
}

/// `part` as a rounded whole percentage of `total`.
fn share_percent(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (part.saturating_mul(100) + total / 2) / total
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let state = auth.state;
    let api = auth.context.api().clone();
    let year = default_exam_year(SystemClock.now());
    let summary = LocalResource::new(move || {
        let api = api.clone();
        async move { load_summary(&api, year).await }
    });

    let greeting = move || {
        state.with(|state| {
            state
                .session()
                .map(|session| format!("Welcome, {}", session.display_name()))
                .unwrap_or_default()
        })
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1>{greeting}</h1>
            </header>
            <Suspense fallback=move || view! { <p>"Loading summary..."</p> }>
                {move || {
                    summary
                        .get()
                        .map(|result| match result {
                            Ok(summary) => view! { <SummaryView summary/> }.into_any(),
                            Err(error) => {
                                view! { <p class="dashboard-page__error">{error.to_string()}</p> }.into_any()
                            }
                        })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn SummaryView(summary: Summary) -> impl IntoView {
    let in_year = summary.in_year;
    let rows = summary
        .by_level
        .into_iter()
        .map(|row| {
            let share = format!("{}%", share_percent(row.student_count, in_year));
            view! {
                <tr>
                    <td>{row.level_name}</td>
                    <td>{row.student_count.to_string()}</td>
                    <td>{share}</td>
                </tr>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <section class="dashboard-page__stats">
            <div class="stat">
                <span class="stat__label">"All students"</span>
                <span class="stat__value">{summary.total.to_string()}</span>
            </div>
            <div class="stat">
                <span class="stat__label">{format!("Registered in {}", summary.year)}</span>
                <span class="stat__value">{in_year.to_string()}</span>
            </div>
        </section>
        <table class="dashboard-page__levels">
            <thead>
                <tr>
                    <th>"Level"</th>
                    <th>"Students"</th>
                    <th>"Share"</th>
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
}
