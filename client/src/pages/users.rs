//! User administration (ADMIN): list accounts and remove them.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use leptos::prelude::*;
use registry::endpoints;
use registry::types::User;

use crate::state::auth::use_auth;

fn authorities_label(user: &User) -> String {
    if user.authorities.is_empty() {
        "-".to_owned()
    } else {
        user.authorities.join(", ")
    }
}

/// The signed-in admin may not delete their own account.
fn can_delete(user: &User, current_username: Option<&str>) -> bool {
    current_username != Some(user.username.as_str())
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let auth = use_auth();
    let state = auth.state;
    let api = auth.context.api().clone();
    let info = RwSignal::new(String::new());

    let users = {
        let api = api.clone();
        LocalResource::new(move || {
            let api = api.clone();
            async move { endpoints::list_users(&api).await }
        })
    };

    let on_delete = move |username: String| {
        #[cfg(feature = "csr")]
        {
            let api = api.clone();
            leptos::task::spawn_local(async move {
                match endpoints::delete_user(&api, &username).await {
                    Ok(()) => {
                        info.set(format!("Deleted {username}."));
                        users.refetch();
                    }
                    Err(error) => info.set(error.to_string()),
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&api, username);
        }
    };

    view! {
        <div class="users-page">
            <h1>"Users"</h1>
            <Show when=move || !info.get().is_empty()>
                <p class="users-page__message">{move || info.get()}</p>
            </Show>
            <Suspense fallback=move || view! { <p>"Loading users..."</p> }>
                {move || {
                    let current = state.with(|state| state.session().map(|s| s.username.clone()));
                    let on_delete = on_delete.clone();
                    users
                        .get()
                        .map(move |result| match result {
                            Ok(list) => {
                                view! {
                                    <table class="users-page__table">
                                        <thead>
                                            <tr>
                                                <th>"Name"</th>
                                                <th>"Username"</th>
                                                <th>"Email"</th>
                                                <th>"Mobile"</th>
                                                <th>"Authorities"</th>
                                                <th></th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {list
                                                .into_iter()
                                                .map(|user| {
                                                    let deletable = can_delete(&user, current.as_deref());
                                                    let label = authorities_label(&user);
                                                    let username = user.username.clone();
                                                    let on_delete = on_delete.clone();
                                                    view! {
                                                        <tr>
                                                            <td>{user.name}</td>
                                                            <td>{user.username}</td>
                                                            <td>{user.email}</td>
                                                            <td>{user.mobile_number}</td>
                                                            <td>{label}</td>
                                                            <td>
                                                                <button
                                                                    class="btn btn--danger"
                                                                    disabled=!deletable
                                                                    on:click=move |_| on_delete(username.clone())
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
                                }
                                    .into_any()
                            }
                            Err(error) => view! { <p class="users-page__error">{error.to_string()}</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}
