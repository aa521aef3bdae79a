//! Login page component.

use compliance_console_session::{LoginCredentials, route};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::session::use_session;

/// Email and password form. On success the user goes back to the page the
/// edge filter turned them away from, or to their role's landing page.
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let query = use_query_map();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (pending, set_pending) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(lifecycle) = session.lifecycle() else {
            set_error.set(Some("Still starting up, try again in a moment.".to_string()));
            return;
        };
        let credentials = LoginCredentials::new(email.get_untracked(), password.get_untracked());
        let from = query.with_untracked(|query| query.get("from"));
        let navigate = navigate.clone();

        set_pending.set(true);
        set_error.set(None);
        spawn_local(async move {
            match lifecycle.login(&credentials).await {
                Ok(Some(signed_in)) => {
                    let target = from
                        .as_deref()
                        .and_then(route::return_target)
                        .unwrap_or_else(|| route::landing_path(signed_in.role()))
                        .to_string();
                    navigate(&target, NavigateOptions::default());
                }
                Ok(None) => {
                    set_error.set(Some("Signed in, but your profile could not be loaded.".to_string()));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "login rejected");
                    set_error.set(Some("Invalid email or password.".to_string()));
                }
            }
            set_pending.set(false);
        });
    };

    view! {
        <div class="login-page">
            <form class="login-box" on:submit=on_submit>
                <h1>"Sign in to Compliance Console"</h1>
                <div class="form-group">
                    <label for="email">"Email"</label>
                    <input
                        id="email"
                        type="email"
                        autocomplete="username"
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        autocomplete="current-password"
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>
                {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                <button type="submit" class="login-button" disabled=move || pending.get()>
                    {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
