//! Home page component.

use leptos::prelude::*;

use crate::session::use_session;

/// Landing page for standard roles.
#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();

    let greeting = move || {
        session.snapshot().with(|snapshot| {
            snapshot
                .session
                .as_ref()
                .map(|s| format!("Welcome, {}!", s.display_name()))
                .unwrap_or_else(|| "Welcome!".to_string())
        })
    };

    view! {
        <div class="home-page">
            <h1>{greeting}</h1>
            <p>"Track assets, audits, risks and training for your company."</p>
        </div>
    }
}
